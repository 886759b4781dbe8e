//! Prompt templates handed to the external text generator.
use serde::Serialize;

use kbase_core::Citation;

/// System + user prompt for one exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Render `[n] title / URL / Content` blocks, numbered from 1 in the order
/// given. The generated answer refers to sources by these numbers, so the
/// citations must be displayed in this same order.
pub fn render_context(citations: &[Citation]) -> String {
    citations
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {}\nURL: {}\nContent: {}", i + 1, c.title, c.url, c.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_grounding_prompt(citations: &[Citation]) -> String {
    format!(
        "You are Drata's AI assistant. You help people understand Drata's compliance automation platform \
and answer only from the context documents below.

INSTRUCTIONS:
- Answer questions about Drata's products, features, pricing, integrations and compliance capabilities
- Base every statement on the context documents
- Cite sources with the bracket numbers of the context documents, e.g. [1], [2]
- If the context does not contain the answer, say so plainly instead of guessing
- Keep answers concise and professional

CONTEXT DOCUMENTS:
{}

Cite your sources and keep the answer focused on how Drata addresses the question.",
        render_context(citations)
    )
}

pub fn build_user_prompt(question: &str) -> String {
    format!(
        "Question: {}\n\nAnswer using only the context provided in the system prompt. Cite sources as [1], [2], etc.",
        question.trim()
    )
}

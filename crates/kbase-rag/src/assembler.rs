use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use kbase_core::traits::Retriever;
use kbase_core::{Category, ChatResponse, Citation, Result};
use kbase_text::SearchRanker;

use crate::followups::select_follow_ups;
use crate::prompt::{build_grounding_prompt, build_user_prompt, PromptPair};

/// Everything needed to call the generator and answer the widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedAnswer {
    pub prompt: PromptPair,
    pub response: ChatResponse,
}

/// Turns a query into citations, prompts and the response envelope.
///
/// Holds the shared retriever; cheap to clone per request.
pub struct ResponseAssembler<R: Retriever = SearchRanker> {
    retriever: Arc<R>,
    default_k: usize,
}

impl<R: Retriever> Clone for ResponseAssembler<R> {
    fn clone(&self) -> Self {
        Self { retriever: Arc::clone(&self.retriever), default_k: self.default_k }
    }
}

impl<R: Retriever> ResponseAssembler<R> {
    pub fn new(retriever: Arc<R>, default_k: usize) -> Self {
        Self { retriever, default_k }
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Ranked citations, best first; `k` falls back to the configured default.
    pub fn retrieve_citations(&self, query: &str, k: Option<usize>) -> Result<Vec<Citation>> {
        let k = k.unwrap_or(self.default_k);
        let results = self.retriever.search(query, k)?;
        Ok(results.iter().map(Citation::from).collect())
    }

    pub fn build_prompt(&self, query: &str, citations: &[Citation]) -> PromptPair {
        PromptPair {
            system_prompt: build_grounding_prompt(citations),
            user_prompt: build_user_prompt(query),
        }
    }

    /// Category of the top citation's document; `None` without citations or
    /// when that document cannot be resolved.
    pub fn primary_category(&self, citations: &[Citation]) -> Option<Category> {
        let top = citations.first()?;
        self.retriever.get_document_by_id(&top.id).map(|doc| doc.category)
    }

    pub fn assemble_response(&self, content: impl Into<String>, citations: Vec<Citation>, original_query: &str) -> ChatResponse {
        let category = self.primary_category(&citations);
        let follow_ups = select_follow_ups(original_query, category);
        debug!(citations = citations.len(), category = ?category, follow_ups = follow_ups.len(), "assembled response");
        ChatResponse { content: content.into(), citations, follow_ups }
    }

    /// Retrieval, prompts and envelope in one go. Content is left empty: the
    /// generated text is streamed separately by the caller.
    pub fn prepare(&self, query: &str, k: Option<usize>) -> Result<PreparedAnswer> {
        let citations = self.retrieve_citations(query, k)?;
        let prompt = self.build_prompt(query, &citations);
        let response = self.assemble_response(String::new(), citations, query);
        Ok(PreparedAnswer { prompt, response })
    }
}

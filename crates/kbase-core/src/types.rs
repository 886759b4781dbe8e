//! Domain types shared by the ranker, the response assembler and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type DocId = String;

/// Fixed set of corpus categories. Serialised lowercase to match the corpus file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Product,
    Security,
    Pricing,
    Integrations,
    Compliance,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Product,
        Category::Security,
        Category::Pricing,
        Category::Integrations,
        Category::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Product => "product",
            Category::Security => "security",
            Category::Pricing => "pricing",
            Category::Integrations => "integrations",
            Category::Compliance => "compliance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == needle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A corpus entry. Immutable once the store is loaded.
///
/// - `id`: unique, non-empty identifier
/// - `url`: public page the entry was written from
/// - `summary`: one-line description, used as the snippet fallback
/// - `content`: full text, source of highlights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeItem {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub category: Category,
    pub summary: String,
    pub content: String,
}

/// A ranked hit: the matched item, its engine score and up to two highlights.
///
/// `score` is engine-specific but higher is always better.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub item: KnowledgeItem,
    pub score: f32,
    pub highlights: Vec<String>,
}

/// Presentation-facing projection of a [`SearchResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f32,
}

impl From<&SearchResult> for Citation {
    fn from(result: &SearchResult) -> Self {
        let snippet = result
            .highlights
            .first()
            .cloned()
            .unwrap_or_else(|| result.item.summary.clone());
        Self {
            id: result.item.id.clone(),
            title: result.item.title.clone(),
            url: result.item.url.clone(),
            snippet,
            score: result.score,
        }
    }
}

/// Envelope handed to the widget alongside (or instead of) streamed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub content: String,
    pub citations: Vec<Citation>,
    pub follow_ups: Vec<String>,
}

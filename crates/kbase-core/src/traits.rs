use crate::error::Result;
use crate::types::{KnowledgeItem, SearchResult};

/// Ranked lookup over a fixed corpus. Implementations are read-only after
/// construction, so one instance can serve any number of concurrent callers.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>>;
    fn get_document_by_id(&self, id: &str) -> Option<&KnowledgeItem>;
}

//! kbase-text
//!
//! Tantivy-backed lexical ranking over the knowledge corpus: schema and
//! analyser setup, fuzzy/prefix query construction, sentence highlights.
pub mod highlight;
pub mod query;
pub mod ranker;
pub mod tantivy_utils;

pub use highlight::extract_highlights;
pub use ranker::SearchRanker;

#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use store::DocumentStore;
pub use types::{Category, ChatResponse, Citation, KnowledgeItem, SearchResult};

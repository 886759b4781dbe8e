//! kbase-rag
//!
//! Response assembly on top of the ranker: grounding prompts, follow-up
//! suggestions, the chat response envelope, plus request validation, query
//! normalisation for cache keys and analytics events.
pub mod analytics;
pub mod assembler;
pub mod chat;
pub mod followups;
pub mod prompt;
pub mod query;

pub use analytics::AnalyticsTracker;
pub use assembler::{PreparedAnswer, ResponseAssembler};
pub use chat::{ChatMessage, ChatRequest, Role};
pub use followups::select_follow_ups;
pub use prompt::{build_grounding_prompt, build_user_prompt, PromptPair};
pub use query::{cache_key, normalize_query};

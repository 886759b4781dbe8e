//! Inbound widget payload.
use serde::{Deserialize, Serialize};

use kbase_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::InvalidRequest(e.to_string()))
    }

    /// The query to answer: the last message, which must come from the user
    /// and must not be blank.
    pub fn last_user_query(&self) -> Result<&str> {
        let last = self
            .messages
            .last()
            .ok_or_else(|| Error::InvalidRequest("no messages".to_string()))?;
        if last.role != Role::User {
            return Err(Error::InvalidRequest("last message is not from the user".to_string()));
        }
        let query = last.content.trim();
        if query.is_empty() {
            return Err(Error::InvalidRequest("empty question".to_string()));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_last_user_message() {
        let req = ChatRequest::from_json(
            r#"{"messages":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"},{"role":"user","content":" Is there a startup plan? "}]}"#,
        )
        .unwrap();
        assert_eq!(req.last_user_query().unwrap(), "Is there a startup plan?");
    }

    #[test]
    fn rejects_bad_shapes() {
        let assistant_last = ChatRequest::from_json(r#"{"messages":[{"role":"assistant","content":"x"}]}"#).unwrap();
        assert!(matches!(assistant_last.last_user_query(), Err(Error::InvalidRequest(_))));

        let empty = ChatRequest::from_json(r#"{"messages":[]}"#).unwrap();
        assert!(empty.last_user_query().is_err());

        let blank = ChatRequest::from_json(r#"{"messages":[{"role":"user","content":"  "}]}"#).unwrap();
        assert!(blank.last_user_query().is_err());

        assert!(matches!(ChatRequest::from_json(r#"{"messages":[{"role":"robot","content":"x"}]}"#), Err(Error::InvalidRequest(_))));
        assert!(ChatRequest::from_json("not json").is_err());
    }
}

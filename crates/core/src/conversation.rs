//! Caller-supplied conversation history.
//!
//! History lives for one request only. It is replayed to the provider in the order given.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The web client labels its own turns `model`.
    #[serde(alias = "model")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Parse the JSON-encoded history form field.
///
/// Blank or malformed input yields an empty history rather than an error.
pub fn parse_history(raw: &str) -> Vec<ConversationTurn> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str(raw) {
        Ok(turns) => turns,
        Err(e) => {
            tracing::warn!("ignoring malformed conversation history: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_preserves_order() {
        let turns = parse_history(
            r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]"#,
        );

        assert_eq!(
            turns,
            vec![
                ConversationTurn::user("hi"),
                ConversationTurn::assistant("hello")
            ]
        );
    }

    #[test]
    fn test_parse_history_accepts_model_role() {
        let turns = parse_history(r#"[{"role":"model","content":"Hello! What symptoms?"}]"#);

        assert_eq!(turns[0].role, Role::Assistant);
    }

    #[test]
    fn test_parse_history_malformed_is_empty() {
        assert!(parse_history("not json").is_empty());
        assert!(parse_history(r#"{"role":"user"}"#).is_empty());
        assert!(parse_history(r#"[{"role":"narrator","content":"x"}]"#).is_empty());
        assert!(parse_history("").is_empty());
    }
}

//! Chat endpoint bodies.
//!
//! `ChatReq` mirrors the form fields the web client posts. `history` arrives as a JSON string
//! inside the form and is decoded by the core, which treats malformed JSON as no history.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_language() -> String {
    "en".to_string()
}

/// Form fields accepted by `POST /chat` and `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    /// Spoken or typed symptoms.
    pub symptoms: String,
    /// Illness duration, e.g. "3 days".
    #[serde(default)]
    pub duration: String,
    /// Target language code, e.g. "en", "hi", "mr".
    #[serde(default = "default_language")]
    pub language: String,
    /// JSON array of `{role, content}` turns.
    #[serde(default)]
    pub history: String,
}

/// Reply body returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub reply: String,
    pub reply_translated: String,
}

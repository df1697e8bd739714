//! Chat-completion provider strategies.
//!
//! The resolver only sees [`ChatProvider`]; which vendor sits behind it is decided once at
//! startup by [`create_provider`] from the resolved [`ProviderConfig`].

pub mod gemini;
pub mod ollama;
pub mod openai_compat;

use crate::config::{ProviderConfig, ProviderKind};
use crate::conversation::ConversationTurn;
use crate::{AssistantError, AssistantResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// One chat-completion call: instruction, prior turns in order, then the new user message.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub history: &'a [ConversationTurn],
    pub message: &'a str,
    pub temperature: f32,
}

/// Trait for chat-completion vendors.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short vendor name used in logs.
    fn name(&self) -> &'static str;

    /// Send the request and return the generated text.
    ///
    /// Failures are classified into `ProviderRateLimited`, `ProviderTimeout`,
    /// `ProviderUnreachable`, `ProviderStatus`, `ProviderBadResponse` or `ProviderRequest`.
    async fn send_chat(&self, request: &ChatRequest<'_>) -> AssistantResult<String>;
}

/// Create a provider instance based on configuration.
pub fn create_provider(
    config: &ProviderConfig,
    timeout: Duration,
) -> AssistantResult<Arc<dyn ChatProvider>> {
    let client = http_client(timeout)?;
    let provider: Arc<dyn ChatProvider> = match config.kind() {
        ProviderKind::Ollama => Arc::new(ollama::OllamaProvider::new(config, client)),
        ProviderKind::Groq | ProviderKind::OpenRouter => {
            Arc::new(openai_compat::OpenAiCompatProvider::new(config, client)?)
        }
        ProviderKind::Gemini => Arc::new(gemini::GeminiProvider::new(config, client)?),
    };
    Ok(provider)
}

pub(crate) fn http_client(timeout: Duration) -> AssistantResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AssistantError::InvalidConfig(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn require_api_key(config: &ProviderConfig) -> AssistantResult<String> {
    config.api_key().map(str::to_string).ok_or_else(|| {
        AssistantError::InvalidConfig(format!("{:?} provider requires an API key", config.kind()))
    })
}

/// Classify a transport-level failure.
pub(crate) fn send_error(provider: &str, e: reqwest::Error) -> AssistantError {
    if e.is_timeout() {
        AssistantError::ProviderTimeout(format!("{provider}: {e}"))
    } else if e.is_connect() {
        AssistantError::ProviderUnreachable(format!("{provider}: {e}"))
    } else {
        AssistantError::ProviderRequest(format!("{provider}: {e}"))
    }
}

/// Pass successful responses through; classify everything else.
///
/// Quota errors arrive either as HTTP 429 or, from Gemini, as a `RESOURCE_EXHAUSTED` status
/// in the error body.
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> AssistantResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        return Err(AssistantError::ProviderRateLimited(format!(
            "{provider} returned {status}"
        )));
    }

    Err(AssistantError::ProviderStatus {
        status: status.as_u16(),
        body: body.chars().take(500).collect(),
    })
}

/// Read a JSON body, mapping decode failures to a bad response.
pub(crate) async fn json_body(
    provider: &str,
    response: reqwest::Response,
) -> AssistantResult<serde_json::Value> {
    response.json().await.map_err(|e| {
        if e.is_timeout() {
            AssistantError::ProviderTimeout(format!("{provider}: {e}"))
        } else {
            AssistantError::ProviderBadResponse(format!(
                "{provider}: failed to parse response: {e}"
            ))
        }
    })
}

/// OpenAI-style message list shared by Ollama and the compatible hosted APIs.
pub(crate) fn openai_messages(request: &ChatRequest<'_>) -> Vec<serde_json::Value> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(serde_json::json!({ "role": "system", "content": request.system }));
    messages.extend(request.history.iter().map(|turn| {
        serde_json::json!({ "role": turn.role.as_str(), "content": turn.content })
    }));
    messages.push(serde_json::json!({ "role": "user", "content": request.message }));
    messages
}

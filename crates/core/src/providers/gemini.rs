//! Google Gemini `generateContent` provider.
//!
//! Gemini takes the system instruction out of band and calls the assistant role `model`.

use super::{check_status, json_body, require_api_key, send_error, ChatProvider, ChatRequest};
use crate::config::ProviderConfig;
use crate::conversation::Role;
use crate::{AssistantError, AssistantResult};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, client: reqwest::Client) -> AssistantResult<Self> {
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            api_key: require_api_key(config)?,
        })
    }
}

/// Request body for `generateContent`.
pub(crate) fn gemini_body(request: &ChatRequest<'_>) -> Value {
    let mut contents: Vec<Value> = request
        .history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            json!({ "role": role, "parts": [{ "text": turn.content }] })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": request.message }] }));

    json!({
        "systemInstruction": { "parts": [{ "text": request.system }] },
        "contents": contents,
        "generationConfig": { "temperature": request.temperature },
    })
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn candidate_text(value: &Value) -> Option<String> {
    let parts = value["candidates"].get(0)?["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    Some(text)
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn send_chat(&self, request: &ChatRequest<'_>) -> AssistantResult<String> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_body(request))
            .send()
            .await
            .map_err(|e| send_error(self.name(), e))?;
        let response = check_status(self.name(), response).await?;
        let value = json_body(self.name(), response).await?;

        candidate_text(&value).ok_or_else(|| {
            let reason = value["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates");
            AssistantError::ProviderBadResponse(format!("gemini: {reason}"))
        })
    }
}

//! OpenAI-compatible chat completions, used for Groq and OpenRouter.

use super::{
    check_status, json_body, openai_messages, require_api_key, send_error, ChatProvider,
    ChatRequest,
};
use crate::config::{ProviderConfig, ProviderKind};
use crate::{AssistantError, AssistantResult};
use async_trait::async_trait;
use serde_json::json;

pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    name: &'static str,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiCompatProvider {
    pub fn new(config: &ProviderConfig, client: reqwest::Client) -> AssistantResult<Self> {
        let name = match config.kind() {
            ProviderKind::OpenRouter => "openrouter",
            _ => "groq",
        };
        Ok(Self {
            client,
            name,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            api_key: require_api_key(config)?,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send_chat(&self, request: &ChatRequest<'_>) -> AssistantResult<String> {
        let body = json!({
            "model": self.model,
            "messages": openai_messages(request),
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "Med-AI")
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.name, e))?;
        let response = check_status(self.name, response).await?;
        let value = json_body(self.name, response).await?;

        value["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AssistantError::ProviderBadResponse(format!(
                    "{}: no content in response",
                    self.name
                ))
            })
    }
}

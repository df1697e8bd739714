//! Ollama provider: a locally running model behind `POST /api/chat`.

use super::{check_status, json_body, openai_messages, send_error, ChatProvider, ChatRequest};
use crate::config::ProviderConfig;
use crate::{AssistantError, AssistantResult};
use async_trait::async_trait;
use serde_json::json;

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn send_chat(&self, request: &ChatRequest<'_>) -> AssistantResult<String> {
        let body = json!({
            "model": self.model,
            "messages": openai_messages(request),
            "stream": false,
            "options": { "temperature": request.temperature },
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.name(), e))?;
        let response = check_status(self.name(), response).await?;
        let value = json_body(self.name(), response).await?;

        value["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AssistantError::ProviderBadResponse("ollama: no message content".to_string())
            })
    }
}

//! Advice resolution.
//!
//! Each request walks a small state machine:
//!
//! - **primary call**: grounded chat completion with prior history replayed in order. A usable
//!   reply (at least `min_reply_chars` after trimming) ends resolution.
//! - **rate limited**: the provider signalled a quota error. Wait `retry_delay` and call again,
//!   up to `max_attempts` calls in total.
//! - **fallback**: any other failure, an unusable reply or exhausted retries select a keyword
//!   template.
//! - **degraded**: nothing to classify; a fixed apology is returned.
//!
//! The retry wait is an async sleep, so it holds no worker thread and is dropped with the
//! request future if the caller goes away.

use crate::config::ResolverConfig;
use crate::constants::DEGRADED_APOLOGY;
use crate::conversation::ConversationTurn;
use crate::fallback::{self, FallbackCategory};
use crate::prompt;
use crate::providers::{ChatProvider, ChatRequest};
use crate::{AssistantError, AssistantResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inputs for one resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceRequest<'a> {
    pub symptoms: &'a str,
    pub duration: Option<&'a str>,
    pub history: &'a [ConversationTurn],
    pub knowledge_base: Option<&'a str>,
    /// Set in native language mode to have the model answer in this language.
    pub reply_language: Option<&'a str>,
}

/// Where the advice text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceSource {
    Provider,
    Fallback(FallbackCategory),
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

/// Resolves advice text through a provider strategy with keyword fallback.
pub struct AdviceResolver {
    provider: Arc<dyn ChatProvider>,
    config: ResolverConfig,
}

impl AdviceResolver {
    pub fn new(provider: Arc<dyn ChatProvider>, config: ResolverConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve advice for one request. Never fails.
    pub async fn resolve(&self, request: &AdviceRequest<'_>) -> Advice {
        debug!(symptoms = request.symptoms, "resolving advice");

        if request.symptoms.trim().is_empty() {
            return degraded();
        }

        match self.primary_call(request).await {
            Ok(text) => {
                info!(provider = self.provider.name(), "advice generated by provider");
                return Advice {
                    text,
                    source: AdviceSource::Provider,
                };
            }
            Err(e) => warn!(
                provider = self.provider.name(),
                "primary call failed, using fallback: {}", e
            ),
        }

        match fallback::classify(request.symptoms) {
            Some((category, text)) => {
                info!(category = category.as_str(), "fallback advice selected");
                Advice {
                    text,
                    source: AdviceSource::Fallback(category),
                }
            }
            None => degraded(),
        }
    }

    async fn primary_call(&self, request: &AdviceRequest<'_>) -> AssistantResult<String> {
        let system = prompt::grounding_instruction(request.knowledge_base, request.reply_language);
        let message = prompt::user_message(request.symptoms, request.duration);
        let chat = ChatRequest {
            system: &system,
            history: request.history,
            message: &message,
            temperature: self.config.temperature,
        };

        let mut attempt = 1;
        loop {
            debug!(attempt, "calling {}", self.provider.name());
            let outcome =
                tokio::time::timeout(self.config.request_timeout, self.provider.send_chat(&chat))
                    .await
                    .unwrap_or_else(|_| {
                        Err(AssistantError::ProviderTimeout(format!(
                            "{} did not answer within {:?}",
                            self.provider.name(),
                            self.config.request_timeout
                        )))
                    });

            match outcome {
                Ok(text) => return self.accept(text),
                Err(e) if e.is_rate_limited() && attempt < self.config.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        "rate limited, retrying in {:?}",
                        self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn accept(&self, text: String) -> AssistantResult<String> {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.config.min_reply_chars {
            return Err(AssistantError::ProviderBadResponse(format!(
                "reply too short ({} characters)",
                trimmed.chars().count()
            )));
        }
        Ok(trimmed.to_string())
    }
}

fn degraded() -> Advice {
    warn!("no symptoms to classify, returning degraded reply");
    Advice {
        text: DEGRADED_APOLOGY.to_string(),
        source: AdviceSource::Degraded,
    }
}

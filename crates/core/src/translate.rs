//! Best-effort translation of advice text.
//!
//! [`translate_or_annotate`] is the boundary: it never fails. English or empty targets are
//! passed through without a network call, and any provider failure returns the original text
//! with [`UNTRANSLATED_NOTICE`] appended.

use crate::constants::UNTRANSLATED_NOTICE;
use crate::{AssistantError, AssistantResult};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for translation vendors.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> AssistantResult<String>;
}

/// Whether `target` needs no translation.
pub fn is_passthrough_language(target: &str) -> bool {
    let target = target.trim();
    target.is_empty() || target.eq_ignore_ascii_case("en") || target.eq_ignore_ascii_case("english")
}

/// Translate `text` into `target` with auto-detected source language.
pub async fn translate_or_annotate(
    translator: &dyn Translator,
    text: &str,
    target: &str,
) -> String {
    if is_passthrough_language(target) {
        return text.to_string();
    }

    match translator.translate(text, "auto", target.trim()).await {
        Ok(translated) if !translated.trim().is_empty() => translated,
        Ok(_) => {
            tracing::warn!(target_language = target, "translation came back empty");
            format!("{text}{UNTRANSLATED_NOTICE}")
        }
        Err(e) => {
            tracing::warn!(target_language = target, "translation failed: {}", e);
            format!("{text}{UNTRANSLATED_NOTICE}")
        }
    }
}

/// Google Translate's public `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AssistantError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// The endpoint answers with nested arrays; the first element lists translated segments.
pub(crate) fn join_segments(value: &serde_json::Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();
    Some(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> AssistantResult<String> {
        let response = self
            .client
            .get(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| AssistantError::TranslationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistantError::TranslationFailed(format!(
                "translation service returned {}",
                response.status()
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AssistantError::TranslationFailed(e.to_string()))?;

        join_segments(&value).ok_or_else(|| {
            AssistantError::TranslationFailed("unexpected translation response shape".into())
        })
    }
}

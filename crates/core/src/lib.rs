//! # Med-AI Core
//!
//! Core logic for the Med-AI symptom intake assistant.
//!
//! This crate contains:
//! - Knowledge base compaction from the disease, precaution and symptom datasets
//! - Advice resolution: grounded provider call, rate-limit retries, keyword fallback
//! - Best-effort translation of the advice
//!
//! **No API concerns**: HTTP routing, static assets and process startup belong in `api-rest`
//! and the binaries.

pub mod config;
pub mod constants;
pub mod conversation;
pub mod error;
pub mod fallback;
pub mod knowledge;
pub mod prompt;
pub mod providers;
pub mod resolver;
pub mod translate;

pub use config::{CoreConfig, LanguageMode, ProviderConfig, ProviderKind, ResolverConfig};
pub use conversation::{parse_history, ConversationTurn, Role};
pub use error::{AssistantError, AssistantResult};
pub use knowledge::{DiseaseRecord, KnowledgeBase, KnowledgeSources};
pub use resolver::{Advice, AdviceRequest, AdviceResolver, AdviceSource};

use providers::ChatProvider;
use std::sync::Arc;
use translate::{GoogleTranslator, Translator};

/// One chat turn as received from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    pub symptoms: String,
    pub duration: Option<String>,
    /// Target language code; empty or `en` means English.
    pub language: String,
    pub history: Vec<ConversationTurn>,
}

/// Advice plus its (possibly) translated rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceResult {
    pub advice: String,
    pub translated: String,
}

/// Request-path service shared by every handler.
///
/// Holds no per-request state; the knowledge base is loaded once and only read afterwards.
#[derive(Clone)]
pub struct AdviceService {
    resolver: Arc<AdviceResolver>,
    translator: Arc<dyn Translator>,
    knowledge_base: Option<KnowledgeBase>,
    language_mode: LanguageMode,
}

impl AdviceService {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        translator: Arc<dyn Translator>,
        knowledge_base: Option<KnowledgeBase>,
        resolver_config: ResolverConfig,
        language_mode: LanguageMode,
    ) -> Self {
        Self {
            resolver: Arc::new(AdviceResolver::new(provider, resolver_config)),
            translator,
            knowledge_base,
            language_mode,
        }
    }

    /// Build the service from startup configuration.
    ///
    /// A missing knowledge base file is not fatal: the service runs ungrounded and says so in
    /// the log.
    pub fn from_config(cfg: &CoreConfig) -> AssistantResult<Self> {
        let resolver_config = cfg.resolver().clone();
        let provider = providers::create_provider(cfg.provider(), resolver_config.request_timeout)?;
        let translator = Arc::new(GoogleTranslator::new(
            cfg.translate_url(),
            resolver_config.request_timeout,
        )?);

        let knowledge_base = match KnowledgeBase::load(cfg.knowledge_base_path()) {
            Ok(kb) => {
                tracing::info!(
                    bytes = kb.as_str().len(),
                    "loaded knowledge base from {}",
                    cfg.knowledge_base_path().display()
                );
                Some(kb)
            }
            Err(e) => {
                tracing::warn!("running without knowledge base grounding: {}", e);
                None
            }
        };

        tracing::info!(
            provider = provider.name(),
            model = cfg.provider().model(),
            language_mode = ?cfg.language_mode(),
            "advice service ready"
        );

        Ok(Self::new(
            provider,
            translator,
            knowledge_base,
            resolver_config,
            cfg.language_mode(),
        ))
    }

    pub fn is_grounded(&self) -> bool {
        self.knowledge_base.is_some()
    }

    /// Resolve advice for one chat turn and produce the translated rendering.
    ///
    /// In native mode the model is asked to reply in the target language, so provider output
    /// is not translated again. Fallback templates are English and are always translated.
    pub async fn respond(&self, input: &ChatInput) -> AdviceResult {
        let wants_translation = !translate::is_passthrough_language(&input.language);
        let native = self.language_mode == LanguageMode::Native && wants_translation;

        let advice = self
            .resolver
            .resolve(&AdviceRequest {
                symptoms: &input.symptoms,
                duration: input.duration.as_deref(),
                history: &input.history,
                knowledge_base: self.knowledge_base.as_ref().map(KnowledgeBase::as_str),
                reply_language: native.then_some(input.language.as_str()),
            })
            .await;

        let translated = if native && advice.source == AdviceSource::Provider {
            advice.text.clone()
        } else {
            translate::translate_or_annotate(
                self.translator.as_ref(),
                &advice.text,
                &input.language,
            )
            .await
        };

        AdviceResult {
            advice: advice.text,
            translated,
        }
    }
}

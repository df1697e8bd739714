//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in the request path reads environment variables; binaries hand a lookup function to
//! [`CoreConfig::from_lookup`] instead, which keeps resolution testable with plain maps.

use crate::constants::{DEFAULT_KNOWLEDGE_BASE_PATH, DEFAULT_TRANSLATE_URL, PLACEHOLDER_API_KEY};
use crate::{AssistantError, AssistantResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Chat-completion vendors the resolver can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local Ollama daemon.
    Ollama,
    /// Groq hosted OpenAI-compatible API.
    Groq,
    /// OpenRouter hosted OpenAI-compatible API.
    OpenRouter,
    /// Google Gemini `generateContent` API.
    Gemini,
}

impl ProviderKind {
    /// Environment variable holding the API key for this vendor, if one is needed.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Ollama => None,
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "llama3.2:1b",
            ProviderKind::Groq => "llama3-8b-8192",
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
            ProviderKind::Gemini => "gemini-2.5-flash",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "http://localhost:11434",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AssistantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "groq" => Ok(ProviderKind::Groq),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(AssistantError::InvalidConfig(format!(
                "unknown provider '{other}' (expected ollama, groq, openrouter or gemini)"
            ))),
        }
    }
}

/// Connection details for the selected chat provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    kind: ProviderKind,
    model: String,
    base_url: String,
    api_key: Option<String>,
}

impl ProviderConfig {
    /// Create a new `ProviderConfig`, filling in vendor defaults.
    ///
    /// Vendors that need a key reject a missing, blank or placeholder key.
    pub fn new(
        kind: ProviderKind,
        model: Option<String>,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> AssistantResult<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);

        if let Some(var) = kind.api_key_var() {
            if api_key.is_none() {
                return Err(AssistantError::InvalidConfig(format!(
                    "{var} not found or not set"
                )));
            }
        }

        let model = non_blank(model).unwrap_or_else(|| kind.default_model().to_string());
        let base_url = non_blank(base_url)
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            kind,
            model,
            base_url,
            api_key,
        })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// How replies in languages other than English are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageMode {
    /// Generate in English and run the reply through the translation provider.
    #[default]
    Translate,
    /// Ask the model to answer directly in the requested language.
    Native,
}

impl FromStr for LanguageMode {
    type Err = AssistantError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "translate" => Ok(LanguageMode::Translate),
            "native" => Ok(LanguageMode::Native),
            other => Err(AssistantError::InvalidConfig(format!(
                "unknown language mode '{other}' (expected translate or native)"
            ))),
        }
    }
}

/// Tuning for the advice resolver's primary call and rate-limit retries.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Total primary call attempts while the provider keeps signalling rate limits.
    pub max_attempts: u32,
    /// Wait between rate-limited attempts, sized to the provider's per-minute window.
    pub retry_delay: Duration,
    /// Upper bound on a single primary call.
    pub request_timeout: Duration,
    pub temperature: f32,
    /// Replies shorter than this (in characters, after trimming) are treated as unusable.
    pub min_reply_chars: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(22),
            request_timeout: Duration::from_secs(30),
            temperature: 0.7,
            min_reply_chars: 10,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    provider: ProviderConfig,
    resolver: ResolverConfig,
    language_mode: LanguageMode,
    knowledge_base_path: PathBuf,
    translate_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        provider: ProviderConfig,
        resolver: ResolverConfig,
        language_mode: LanguageMode,
        knowledge_base_path: PathBuf,
        translate_url: String,
    ) -> AssistantResult<Self> {
        if resolver.max_attempts == 0 {
            return Err(AssistantError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        if translate_url.trim().is_empty() {
            return Err(AssistantError::InvalidConfig(
                "translate_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            provider,
            resolver,
            language_mode,
            knowledge_base_path,
            translate_url: translate_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve configuration from a key lookup, usually `|k| std::env::var(k).ok()`.
    ///
    /// Recognised keys: `MEDAI_PROVIDER`, `MEDAI_MODEL`, `MEDAI_PROVIDER_URL`, the vendor key
    /// named by [`ProviderKind::api_key_var`], `MEDAI_LANGUAGE_MODE`, `MEDAI_KNOWLEDGE_BASE`
    /// and `MEDAI_TRANSLATE_URL`.
    pub fn from_lookup<F>(lookup: F) -> AssistantResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        let kind = match get("MEDAI_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::Ollama,
        };
        let api_key = kind.api_key_var().and_then(|var| lookup(var));
        let provider = ProviderConfig::new(
            kind,
            get("MEDAI_MODEL"),
            get("MEDAI_PROVIDER_URL"),
            api_key,
        )?;

        let language_mode = match get("MEDAI_LANGUAGE_MODE") {
            Some(value) => value.parse()?,
            None => LanguageMode::default(),
        };
        let knowledge_base_path = get("MEDAI_KNOWLEDGE_BASE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_BASE_PATH));
        let translate_url =
            get("MEDAI_TRANSLATE_URL").unwrap_or_else(|| DEFAULT_TRANSLATE_URL.to_string());

        Self::new(
            provider,
            ResolverConfig::default(),
            language_mode,
            knowledge_base_path,
            translate_url,
        )
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn resolver(&self) -> &ResolverConfig {
        &self.resolver
    }

    pub fn language_mode(&self) -> LanguageMode {
        self.language_mode
    }

    pub fn knowledge_base_path(&self) -> &Path {
        &self.knowledge_base_path
    }

    pub fn translate_url(&self) -> &str {
        &self.translate_url
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_local_ollama() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[])).expect("defaults should resolve");

        assert_eq!(cfg.provider().kind(), ProviderKind::Ollama);
        assert_eq!(cfg.provider().model(), "llama3.2:1b");
        assert_eq!(cfg.provider().base_url(), "http://localhost:11434");
        assert_eq!(cfg.language_mode(), LanguageMode::Translate);
        assert_eq!(
            cfg.knowledge_base_path(),
            Path::new(DEFAULT_KNOWLEDGE_BASE_PATH)
        );
        assert_eq!(cfg.resolver().max_attempts, 3);
        assert_eq!(cfg.resolver().retry_delay, Duration::from_secs(22));
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let result = CoreConfig::from_lookup(lookup_from(&[("MEDAI_PROVIDER", "gemini")]));

        match result {
            Err(AssistantError::InvalidConfig(msg)) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("Expected InvalidConfig error, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_api_key_is_rejected() {
        let result = CoreConfig::from_lookup(lookup_from(&[
            ("MEDAI_PROVIDER", "groq"),
            ("GROQ_API_KEY", PLACEHOLDER_API_KEY),
        ]));

        assert!(matches!(result, Err(AssistantError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides_are_applied() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[
            ("MEDAI_PROVIDER", "OpenRouter"),
            ("OPENROUTER_API_KEY", "sk-test"),
            ("MEDAI_MODEL", "meta/llama"),
            ("MEDAI_PROVIDER_URL", "http://proxy.local/v1/"),
            ("MEDAI_LANGUAGE_MODE", "native"),
            ("MEDAI_KNOWLEDGE_BASE", "/srv/kb.txt"),
        ]))
        .expect("overrides should resolve");

        assert_eq!(cfg.provider().kind(), ProviderKind::OpenRouter);
        assert_eq!(cfg.provider().model(), "meta/llama");
        assert_eq!(cfg.provider().base_url(), "http://proxy.local/v1");
        assert_eq!(cfg.provider().api_key(), Some("sk-test"));
        assert_eq!(cfg.language_mode(), LanguageMode::Native);
        assert_eq!(cfg.knowledge_base_path(), Path::new("/srv/kb.txt"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = CoreConfig::from_lookup(lookup_from(&[("MEDAI_PROVIDER", "eliza")]));

        assert!(matches!(result, Err(AssistantError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let provider = ProviderConfig::new(ProviderKind::Ollama, None, None, None).unwrap();
        let resolver = ResolverConfig {
            max_attempts: 0,
            ..ResolverConfig::default()
        };

        let result = CoreConfig::new(
            provider,
            resolver,
            LanguageMode::Translate,
            PathBuf::from(DEFAULT_KNOWLEDGE_BASE_PATH),
            DEFAULT_TRANSLATE_URL.into(),
        );

        assert!(result.is_err());
    }
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("provider rate limited: {0}")]
    ProviderRateLimited(String),
    #[error("provider request timed out: {0}")]
    ProviderTimeout(String),
    #[error("provider unreachable: {0}")]
    ProviderUnreachable(String),
    #[error("provider returned an unusable response: {0}")]
    ProviderBadResponse(String),
    #[error("provider returned status {status}: {body}")]
    ProviderStatus { status: u16, body: String },
    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    #[error("translation failed: {0}")]
    TranslationFailed(String),

    #[error("knowledge source missing (path: {path}): {source}", path = path.display())]
    KnowledgeSourceMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge source malformed (path: {path}): {reason}", path = path.display())]
    KnowledgeSourceMalformed { path: PathBuf, reason: String },
    #[error("failed to write knowledge base: {0}")]
    KnowledgeWrite(std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AssistantError {
    /// Whether the provider signalled that the caller exceeded its request quota.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AssistantError::ProviderRateLimited(_))
    }
}

pub type AssistantResult<T> = std::result::Result<T, AssistantError>;

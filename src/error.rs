use thiserror::Error;

use crate::aws::ProviderError;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Falhas do resolver de definições.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A definição não é JSON, ou é JSON com formato errado.
    #[error("malformed state machine definition: {0}")]
    MalformedDefinition(String),
}

impl ResolveError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ResolveError::MalformedDefinition(reason.into())
    }
}

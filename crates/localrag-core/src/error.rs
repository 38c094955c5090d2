use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Pipeline not initialized; call initialize() before query()")]
    NotInitialized,

    #[error("Failed to ingest {source_id}: {reason}")]
    Ingestion { source_id: String, reason: String },

    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Provider '{provider}' returned an empty embedding")]
    EmptyEmbedding { provider: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider { provider: provider.into(), message: message.to_string() }
    }

    pub fn ingestion(source_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Ingestion { source_id: source_id.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

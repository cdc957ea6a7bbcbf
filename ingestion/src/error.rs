use llm_service::LlmError;
use profile_store::StoreError;
use thiserror::Error;

/// Failures across the collect → enhance → populate pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("storage provider: {0}")]
    Storage(String),

    #[error("database provider: {0}")]
    Database(String),

    #[error("content extraction: {0}")]
    Extract(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("enhancement report: {0}")]
    Report(String),
}

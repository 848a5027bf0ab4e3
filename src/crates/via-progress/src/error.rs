use via_domain::OperationId;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("operation not found: {0}")]
    NotFound(OperationId),

    #[error("checkpoint not found for operation: {0}")]
    CheckpointNotFound(OperationId),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProgressError>;

//! Crate-wide error type, mirroring `langgraph_core::error::GraphError`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("external collaborator error: {0}")]
    External(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

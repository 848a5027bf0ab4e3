//! Crate-wide error type (spec.md §7), matching `via_tools::ToolsError`'s
//! per-variant message style.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("chat model call failed: {0}")]
    Model(String),

    #[error("tool-call loop exceeded its maximum of {0} iterations without a final answer")]
    MaxIterationsExceeded(usize),

    #[error(transparent)]
    Tools(#[from] via_tools::ToolsError),

    #[error(transparent)]
    Domain(#[from] via_domain::DomainError),

    #[error(transparent)]
    Extraction(#[from] via_extraction::error::ExtractionError),

    #[error(transparent)]
    Progress(#[from] via_progress::ProgressError),

    #[error("no canvas client configured for this orchestrator")]
    NoCanvasClient,
}

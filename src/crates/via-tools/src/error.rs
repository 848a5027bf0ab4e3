//! Crate-wide error type, mirroring `via_graph_core::tool::ToolError`'s
//! per-variant message style (spec.md §7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolsError>;

#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("no canvas client configured for this tool")]
    NoCanvasClient,

    #[error("no academic search client configured for this tool")]
    NoAcademicClient,

    #[error(transparent)]
    Domain(#[from] via_domain::DomainError),

    #[error(transparent)]
    KgState(#[from] via_kg_state::KgStateError),

    #[error(transparent)]
    Extraction(#[from] via_extraction::ExtractionError),

    #[error(transparent)]
    RagStore(#[from] via_rag_store::RagStoreError),

    #[error(transparent)]
    Embedding(#[from] via_model_provider::embedding::EmbeddingError),
}

impl From<ToolsError> for via_graph_core::tool::ToolError {
    fn from(err: ToolsError) -> Self {
        via_graph_core::tool::ToolError::ExecutionFailed {
            tool: "via-tools".to_string(),
            error: err.to_string(),
        }
    }
}

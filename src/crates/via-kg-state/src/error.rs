use thiserror::Error;

pub type Result<T> = std::result::Result<T, KgStateError>;

#[derive(Debug, Error)]
pub enum KgStateError {
    #[error("card already exists in knowledge graph: {0}")]
    AlreadyExists(String),

    #[error("card not found in knowledge graph: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] via_graph_backend::GraphBackendError),
}

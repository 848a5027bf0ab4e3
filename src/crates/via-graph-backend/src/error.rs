use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphBackendError>;

#[derive(Debug, Error)]
pub enum GraphBackendError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("backend error: {0}")]
    Backend(String),
}

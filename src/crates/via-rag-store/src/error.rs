#[derive(Debug, thiserror::Error)]
pub enum RagStoreError {
    #[error("vector backend error: {0}")]
    Backend(String),

    #[error("embedding error: {0}")]
    Embedding(#[from] via_model_provider::embedding::EmbeddingError),
}

pub type Result<T> = std::result::Result<T, RagStoreError>;

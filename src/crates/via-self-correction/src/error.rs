#[derive(Debug, thiserror::Error)]
pub enum SelfCorrectionError {
    #[error(transparent)]
    KgState(#[from] via_kg_state::KgStateError),

    #[error(transparent)]
    Backend(#[from] via_graph_backend::GraphBackendError),
}

pub type Result<T> = std::result::Result<T, SelfCorrectionError>;

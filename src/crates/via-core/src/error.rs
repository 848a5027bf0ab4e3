use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Orchestrator(#[from] via_orchestrator::OrchestratorError),

    #[error(transparent)]
    SelfCorrection(#[from] via_self_correction::SelfCorrectionError),

    #[error("core is shutting down")]
    ShuttingDown,
}

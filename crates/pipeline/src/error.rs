use photoai_core::error::CoreError;
use photoai_falai::FalAiError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Provider(#[from] FalAiError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

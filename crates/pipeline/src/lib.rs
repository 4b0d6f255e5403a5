//! Job correlation between local records and asynchronous provider jobs.
//!
//! Every submission first inserts a placeholder row, then calls the
//! provider, then attaches the returned request id. Completions arrive by
//! webhook keyed on that request id; a completion that finds no row yet is
//! parked and claimed by the submission once it attaches.

pub mod completion;
pub mod error;
pub mod fanout;
pub mod submission;

use std::sync::Arc;

use photoai_falai::AiProvider;
use sqlx::PgPool;

pub use completion::{CompletionOutcome, ImageResult, TrainingResult};
pub use error::PipelineError;

/// Coordinates submissions and completions for trainings and images.
pub struct JobCorrelator {
    pool: PgPool,
    provider: Arc<dyn AiProvider>,
}

impl JobCorrelator {
    pub fn new(pool: PgPool, provider: Arc<dyn AiProvider>) -> Self {
        Self { pool, provider }
    }
}

use std::sync::Arc;

use photoai_pipeline::JobCorrelator;
use photoai_storage::UploadGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: photoai_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Submission and completion workflow for provider jobs.
    pub pipeline: Arc<JobCorrelator>,
    /// Presigned upload URLs for training archives.
    pub uploads: Arc<UploadGateway>,
}

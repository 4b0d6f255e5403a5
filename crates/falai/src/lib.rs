//! fal.ai provider client.
//!
//! Submits LoRA training and LoRA image generation to the fal queue API
//! (results arrive later by webhook) and performs the one synchronous call
//! used to render a model thumbnail.

pub mod client;
pub mod config;
pub mod error;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::FalAiClient;
pub use config::FalAiConfig;
pub use error::FalAiError;

/// Acknowledgement of a queued provider job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Submission {
    /// Correlation key echoed back in the completion webhook.
    pub request_id: String,
    #[serde(default)]
    pub response_url: Option<String>,
}

/// Operations the job pipeline needs from an image-generation provider.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Queue LoRA training on the archive at `source_archive_url`.
    async fn submit_training(
        &self,
        source_archive_url: &str,
        job_name: &str,
    ) -> Result<Submission, FalAiError>;

    /// Queue one image generation against a trained LoRA.
    async fn submit_generation(
        &self,
        prompt: &str,
        trained_asset_ref: &str,
    ) -> Result<Submission, FalAiError>;

    /// Render a head shot from a trained LoRA synchronously and return the
    /// image URL.
    async fn fetch_generated_asset_sync(&self, asset_ref: &str) -> Result<String, FalAiError>;
}

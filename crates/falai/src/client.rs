//! HTTP client for the fal queue and synchronous endpoints.

use async_trait::async_trait;
use photoai_core::subject::trigger_word;
use serde::Deserialize;

use crate::config::FalAiConfig;
use crate::error::FalAiError;
use crate::{AiProvider, Submission};

/// Queue endpoint for LoRA training.
pub const TRAINING_ENDPOINT: &str = "fal-ai/flux-lora-fast-training";

/// Endpoint for LoRA image generation (queued and synchronous).
pub const GENERATION_ENDPOINT: &str = "fal-ai/flux-lora";

/// Prompt used to render a model's thumbnail.
pub const HEAD_SHOT_PROMPT: &str =
    "Generate a head shot for this user in front of a white background";

/// Response body of a synchronous generation call.
#[derive(Debug, Deserialize)]
struct SyncGenerationResponse {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

/// [`AiProvider`] backed by the fal.ai HTTP API.
pub struct FalAiClient {
    client: reqwest::Client,
    config: FalAiConfig,
}

impl FalAiClient {
    pub fn new(config: FalAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// `POST {queue_url}/{endpoint}?fal_webhook={webhook}` and parse the
    /// queue acknowledgement.
    async fn enqueue(
        &self,
        endpoint: &str,
        webhook_url: &str,
        body: &serde_json::Value,
    ) -> Result<Submission, FalAiError> {
        let response = self
            .client
            .post(format!("{}/{endpoint}", self.config.queue_url))
            .query(&[("fal_webhook", webhook_url)])
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .timeout(self.config.submit_timeout)
            .json(body)
            .send()
            .await?;

        let submission: Submission = Self::parse_response(response).await?;
        tracing::debug!(
            endpoint,
            request_id = %submission.request_id,
            "fal.ai job queued",
        );
        Ok(submission)
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.config.api_key)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, classifying failures
    /// by status.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FalAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FalAiError::from_status(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FalAiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AiProvider for FalAiClient {
    async fn submit_training(
        &self,
        source_archive_url: &str,
        job_name: &str,
    ) -> Result<Submission, FalAiError> {
        let body = serde_json::json!({
            "images_data_url": source_archive_url,
            "trigger_word": trigger_word(job_name),
        });
        self.enqueue(TRAINING_ENDPOINT, &self.config.training_webhook_url(), &body)
            .await
    }

    async fn submit_generation(
        &self,
        prompt: &str,
        trained_asset_ref: &str,
    ) -> Result<Submission, FalAiError> {
        let body = serde_json::json!({
            "prompt": prompt,
            "loras": [{ "path": trained_asset_ref, "scale": 1 }],
        });
        self.enqueue(GENERATION_ENDPOINT, &self.config.image_webhook_url(), &body)
            .await
    }

    async fn fetch_generated_asset_sync(&self, asset_ref: &str) -> Result<String, FalAiError> {
        let body = serde_json::json!({
            "prompt": HEAD_SHOT_PROMPT,
            "loras": [{ "path": asset_ref, "scale": 1 }],
        });

        let response = self
            .client
            .post(format!("{}/{GENERATION_ENDPOINT}", self.config.sync_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .timeout(self.config.sync_timeout)
            .json(&body)
            .send()
            .await?;

        let parsed: SyncGenerationResponse = Self::parse_response(response).await?;
        parsed
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| FalAiError::MissingOutput("no images in response".into()))
    }
}

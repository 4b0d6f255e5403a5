//! Phase 2: applying webhook completions.
//!
//! A completion either updates every `Pending` row keyed by its request id,
//! is recognized as a redelivery, or is parked until a submission attaches
//! the request id to its row.

use photoai_core::error::CoreError;
use photoai_db::models::completion::{JobKind, ParkedCompletion};
use photoai_db::models::status::{ImageStatus, TrainingStatus};
use photoai_db::repositories::{CompletionRepo, ModelRepo, OutputImageRepo};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

use crate::{JobCorrelator, PipelineError};

/// What a delivered completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Rows moved from `Pending` to `Generated`.
    Applied { updated: u64 },
    /// Every matching row was already `Generated`.
    Duplicate,
    /// No row carried the request id; the result is held for a later claim.
    Parked,
    /// The provider reported a failed job; nothing was modified.
    ProviderError,
}

impl CompletionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied { .. } => "applied",
            Self::Duplicate => "duplicate",
            Self::Parked => "parked",
            Self::ProviderError => "provider_error",
        }
    }

    /// Number of rows transitioned.
    pub fn updated(self) -> u64 {
        match self {
            Self::Applied { updated } => updated,
            _ => 0,
        }
    }
}

/// Result fields of a finished training, as stored when parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub tensor_path: String,
    pub thumbnail: Option<String>,
}

/// Result fields of a finished image generation, as stored when parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub image_url: String,
}

impl JobCorrelator {
    /// Apply a training completion.
    ///
    /// Renders the thumbnail from the trained asset before touching the
    /// database; a thumbnail failure is returned and nothing is modified.
    pub async fn complete_training(
        &self,
        request_id: &str,
        tensor_path: &str,
    ) -> Result<CompletionOutcome, PipelineError> {
        if let Some(model) = ModelRepo::find_by_request_id(&self.pool, request_id).await? {
            if model.training_status == TrainingStatus::Generated {
                tracing::info!(model_id = model.id, request_id, "Duplicate training completion");
                return Ok(CompletionOutcome::Duplicate);
            }
        }

        let thumbnail = self.provider.fetch_generated_asset_sync(tensor_path).await?;
        let result = TrainingResult {
            tensor_path: tensor_path.to_string(),
            thumbnail: Some(thumbnail),
        };

        let updated = apply_training(&self.pool, request_id, &result).await?;
        if updated > 0 {
            tracing::info!(request_id, updated, "Training completion applied");
            return Ok(CompletionOutcome::Applied { updated });
        }

        if ModelRepo::find_by_request_id(&self.pool, request_id)
            .await?
            .is_some()
        {
            return Ok(CompletionOutcome::Duplicate);
        }

        self.park(JobKind::Training, request_id, &result).await
    }

    /// Apply an image completion.
    pub async fn complete_image(
        &self,
        request_id: &str,
        image_url: &str,
    ) -> Result<CompletionOutcome, PipelineError> {
        if let Some(image) = OutputImageRepo::find_by_request_id(&self.pool, request_id).await? {
            if image.status == ImageStatus::Generated {
                tracing::info!(image_id = image.id, request_id, "Duplicate image completion");
                return Ok(CompletionOutcome::Duplicate);
            }
        }

        let result = ImageResult {
            image_url: image_url.to_string(),
        };

        let updated = apply_image(&self.pool, request_id, &result).await?;
        if updated > 0 {
            tracing::info!(request_id, updated, "Image completion applied");
            return Ok(CompletionOutcome::Applied { updated });
        }

        if OutputImageRepo::find_by_request_id(&self.pool, request_id)
            .await?
            .is_some()
        {
            return Ok(CompletionOutcome::Duplicate);
        }

        self.park(JobKind::Image, request_id, &result).await
    }

    /// Record a provider-reported job failure. No row is modified.
    pub fn record_provider_error(
        &self,
        kind: JobKind,
        request_id: &str,
        detail: Option<&str>,
    ) -> CompletionOutcome {
        tracing::warn!(
            job_kind = kind.as_str(),
            request_id,
            detail = detail.unwrap_or("<none>"),
            "Provider reported job failure",
        );
        CompletionOutcome::ProviderError
    }

    /// Claim and apply a parked completion for a freshly attached request
    /// id. Returns the number of rows updated.
    ///
    /// The parked row stays locked while the result is applied. If nothing
    /// matches yet the transaction is rolled back and the completion stays
    /// parked; a concurrent claimer blocked on the lock then retries it
    /// against the state it committed.
    pub(crate) async fn claim_parked(
        &self,
        kind: JobKind,
        request_id: &str,
    ) -> Result<u64, PipelineError> {
        let mut tx = self.pool.begin().await?;
        let Some(parked) = CompletionRepo::lock_unclaimed(&mut tx, kind, request_id).await? else {
            return Ok(0);
        };

        let updated = apply_parked(&mut tx, &parked).await?;
        if updated == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        CompletionRepo::mark_claimed(&mut tx, parked.id).await?;
        tx.commit().await?;
        tracing::info!(
            job_kind = kind.as_str(),
            request_id,
            updated,
            "Parked completion applied",
        );
        Ok(updated)
    }

    // ---- private helpers ----

    async fn park<R: Serialize>(
        &self,
        kind: JobKind,
        request_id: &str,
        result: &R,
    ) -> Result<CompletionOutcome, PipelineError> {
        let value = serde_json::to_value(result)
            .map_err(|e| CoreError::Internal(format!("Failed to encode completion: {e}")))?;
        CompletionRepo::park(&self.pool, kind, request_id, &value).await?;

        // The row may have been attached between the update and the park.
        let updated = self.claim_parked(kind, request_id).await?;
        if updated > 0 {
            return Ok(CompletionOutcome::Applied { updated });
        }

        tracing::warn!(
            job_kind = kind.as_str(),
            request_id,
            "Completion matched no row; parked",
        );
        Ok(CompletionOutcome::Parked)
    }
}

async fn apply_parked(
    conn: &mut PgConnection,
    parked: &ParkedCompletion,
) -> Result<u64, PipelineError> {
    let decode_err = |e: serde_json::Error| {
        CoreError::Internal(format!("Corrupt parked completion {}: {e}", parked.id))
    };

    match parked.job_kind.as_str() {
        "training" => {
            let result: TrainingResult =
                serde_json::from_value(parked.result.clone()).map_err(decode_err)?;
            apply_training(conn, &parked.request_id, &result).await
        }
        "image" => {
            let result: ImageResult =
                serde_json::from_value(parked.result.clone()).map_err(decode_err)?;
            apply_image(conn, &parked.request_id, &result).await
        }
        other => Err(CoreError::Internal(format!("Unknown parked job kind '{other}'")).into()),
    }
}

async fn apply_training<'e>(
    executor: impl PgExecutor<'e>,
    request_id: &str,
    result: &TrainingResult,
) -> Result<u64, PipelineError> {
    Ok(ModelRepo::complete_training(
        executor,
        request_id,
        &result.tensor_path,
        result.thumbnail.as_deref(),
    )
    .await?)
}

async fn apply_image<'e>(
    executor: impl PgExecutor<'e>,
    request_id: &str,
    result: &ImageResult,
) -> Result<u64, PipelineError> {
    Ok(OutputImageRepo::complete(executor, request_id, &result.image_url).await?)
}

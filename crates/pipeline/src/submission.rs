//! Phase 1: submitting jobs to the provider.

use photoai_core::error::CoreError;
use photoai_core::types::DbId;
use photoai_db::models::completion::JobKind;
use photoai_db::models::model::{Model, TrainModelRequest};
use photoai_db::models::output_image::{GenerateImageRequest, GeneratePackRequest, OutputImage};
use photoai_db::repositories::{ModelRepo, OutputImageRepo, PackRepo};

use crate::fanout::submit_generations;
use crate::{JobCorrelator, PipelineError};

impl JobCorrelator {
    /// Submit a LoRA training for `user_id`.
    ///
    /// On provider failure the placeholder is removed and the error is
    /// returned, so the caller never observes a row.
    pub async fn submit_training(
        &self,
        user_id: &str,
        input: &TrainModelRequest,
    ) -> Result<Model, PipelineError> {
        let placeholder = ModelRepo::create_placeholder(&self.pool, user_id, input).await?;

        let submission = match self
            .provider
            .submit_training(&input.zip_url, input.name.trim())
            .await
        {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!(model_id = placeholder.id, error = %e, "Training submission failed");
                if let Err(db_err) = ModelRepo::discard_unsubmitted(&self.pool, placeholder.id).await {
                    tracing::error!(
                        model_id = placeholder.id,
                        error = %db_err,
                        "Failed to discard model placeholder",
                    );
                }
                return Err(e.into());
            }
        };

        let request_id = submission.request_id;
        let model = ModelRepo::attach_request_id(&self.pool, placeholder.id, &request_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Model {} placeholder lost before request {request_id} was attached",
                    placeholder.id
                ))
            })?;

        tracing::info!(
            model_id = model.id,
            user_id,
            request_id = %request_id,
            "Training submitted",
        );

        if self.claim_parked(JobKind::Training, &request_id).await? > 0 {
            return self.reload_model(model.id).await;
        }
        Ok(model)
    }

    /// Submit a single image generation against a ready model.
    pub async fn submit_generation(
        &self,
        user_id: &str,
        input: &GenerateImageRequest,
    ) -> Result<OutputImage, PipelineError> {
        let (model, asset) = self.resolve_ready_model(user_id, input.model_id).await?;
        let prompt = input.prompt.trim();

        let placeholder =
            OutputImageRepo::create_placeholder(&self.pool, user_id, model.id, prompt).await?;

        let submission = match self.provider.submit_generation(prompt, &asset).await {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!(image_id = placeholder.id, error = %e, "Generation submission failed");
                self.discard_images(&[placeholder.id]).await;
                return Err(e.into());
            }
        };

        let request_id = submission.request_id;
        let image = OutputImageRepo::attach_request_id(&self.pool, placeholder.id, &request_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Image {} placeholder lost before request {request_id} was attached",
                    placeholder.id
                ))
            })?;

        tracing::info!(
            image_id = image.id,
            model_id = model.id,
            request_id = %request_id,
            "Generation submitted",
        );

        if self.claim_parked(JobKind::Image, &request_id).await? > 0 {
            return self.reload_image(image.id).await;
        }
        Ok(image)
    }

    /// Submit one generation per prompt of a pack, all or nothing.
    ///
    /// Returns the images in prompt order. If any submission fails, every
    /// placeholder of the batch is removed and no row remains.
    pub async fn submit_pack(
        &self,
        user_id: &str,
        input: &GeneratePackRequest,
    ) -> Result<Vec<OutputImage>, PipelineError> {
        let (model, asset) = self.resolve_ready_model(user_id, input.model_id).await?;

        PackRepo::find_by_id(&self.pool, input.pack_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Pack",
                id: input.pack_id,
            })?;

        let prompts: Vec<String> = PackRepo::list_prompts(&self.pool, input.pack_id)
            .await?
            .into_iter()
            .map(|p| p.prompt)
            .collect();
        if prompts.is_empty() {
            return Err(CoreError::Validation(format!("Pack {} has no prompts", input.pack_id)).into());
        }

        let placeholders =
            OutputImageRepo::create_placeholders(&self.pool, user_id, model.id, &prompts).await?;
        let ids: Vec<DbId> = placeholders.iter().map(|p| p.id).collect();

        let submissions = match submit_generations(self.provider.as_ref(), &prompts, &asset).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::warn!(
                    pack_id = input.pack_id,
                    batch_size = ids.len(),
                    error = %e,
                    "Pack submission failed; discarding batch",
                );
                self.discard_images(&ids).await;
                return Err(e.into());
            }
        };

        let pairs: Vec<(DbId, String)> = ids
            .iter()
            .copied()
            .zip(submissions.into_iter().map(|s| s.request_id))
            .collect();

        let mut images = match OutputImageRepo::attach_request_ids(&self.pool, &pairs).await {
            Ok(images) => images,
            Err(e) => {
                let request_ids: Vec<&str> = pairs.iter().map(|(_, r)| r.as_str()).collect();
                tracing::error!(
                    pack_id = input.pack_id,
                    ?request_ids,
                    error = %e,
                    "Failed to attach pack request ids; provider jobs orphaned",
                );
                self.discard_images(&ids).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            pack_id = input.pack_id,
            model_id = model.id,
            batch_size = images.len(),
            "Pack submitted",
        );

        for image in &mut images {
            let Some(request_id) = image.fal_ai_request_id.clone() else {
                continue;
            };
            if self.claim_parked(JobKind::Image, &request_id).await? > 0 {
                *image = self.reload_image(image.id).await?;
            }
        }
        Ok(images)
    }

    // ---- private helpers ----

    /// Resolve a model the user may generate against, with its trained
    /// asset reference.
    async fn resolve_ready_model(
        &self,
        user_id: &str,
        model_id: DbId,
    ) -> Result<(Model, String), PipelineError> {
        let model = ModelRepo::find_ready_for_user(&self.pool, model_id, user_id)
            .await?
            .ok_or(CoreError::ModelNotReady(model_id))?;
        let asset = model
            .tensor_path
            .clone()
            .ok_or(CoreError::ModelNotReady(model_id))?;
        Ok((model, asset))
    }

    async fn discard_images(&self, ids: &[DbId]) {
        if let Err(e) = OutputImageRepo::discard_unsubmitted(&self.pool, ids).await {
            tracing::error!(?ids, error = %e, "Failed to discard image placeholders");
        }
    }

    async fn reload_model(&self, id: DbId) -> Result<Model, PipelineError> {
        ModelRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Model", id }.into())
    }

    async fn reload_image(&self, id: DbId) -> Result<OutputImage, PipelineError> {
        OutputImageRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "OutputImage", id }.into())
    }
}

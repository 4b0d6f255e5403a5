//! Handlers for `/ai/*`: training and single-image generation.
//!
//! Both require authentication via [`AuthUser`].

use axum::extract::State;
use axum::Json;
use photoai_db::models::model::TrainModelRequest;
use photoai_db::models::output_image::GenerateImageRequest;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ImageIdResponse, ModelIdResponse};
use crate::state::AppState;

/// POST /ai/training
///
/// Queue LoRA training on an uploaded archive. The model is visible
/// immediately with status `Pending`.
pub async fn train_model(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TrainModelRequest>,
) -> AppResult<Json<ModelIdResponse>> {
    let model = state.pipeline.submit_training(&auth.user_id, &input).await?;
    Ok(Json(ModelIdResponse { model_id: model.id }))
}

/// POST /ai/generate
///
/// Queue one image against a trained model the caller owns or that is open.
pub async fn generate_image(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GenerateImageRequest>,
) -> AppResult<Json<ImageIdResponse>> {
    let image = state.pipeline.submit_generation(&auth.user_id, &input).await?;
    Ok(Json(ImageIdResponse { image_id: image.id }))
}

//! Output image entity (one requested generation) and its request DTOs.

use photoai_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::ImageStatus;

/// A row from the `output_images` table.
///
/// `image_url` stays empty until the provider's completion webhook lands.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputImage {
    pub id: DbId,
    pub user_id: String,
    pub model_id: DbId,
    pub prompt: String,
    pub fal_ai_request_id: Option<String>,
    pub image_url: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ImageStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /ai/generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[validate(length(min = 1, max = 2000), custom(function = "crate::models::not_blank"))]
    pub prompt: String,
    pub model_id: DbId,
}

/// Body of `POST /pack/generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePackRequest {
    pub model_id: DbId,
    pub pack_id: DbId,
}

/// Query parameters for `GET /image/bulk`.
#[derive(Debug, Deserialize)]
pub struct ImageBulkQuery {
    /// Comma-separated image ids. When absent every image of the caller is
    /// listed.
    pub ids: Option<String>,
    /// Maximum number of results. Defaults to 100, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

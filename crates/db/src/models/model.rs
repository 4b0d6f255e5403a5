//! Model entity (a user-submitted training job) and its submission DTO.

use photoai_core::subject::{Ethnicity, EyeColor, ModelType};
use photoai_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::TrainingStatus;

/// A row from the `models` table.
///
/// `fal_ai_request_id` is `None` only while the row is a placeholder awaiting
/// its provider submission; list queries never return such rows.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: DbId,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub age: i32,
    pub ethnicity: String,
    pub eye_color: String,
    pub bald: bool,
    pub zip_url: String,
    pub fal_ai_request_id: Option<String>,
    #[sqlx(rename = "training_status_id", try_from = "i16")]
    pub training_status: TrainingStatus,
    pub tensor_path: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "open")]
    pub is_open: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /ai/training`.
///
/// `ethinicity` is accepted as an alias because older web clients send it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainModelRequest {
    #[validate(length(min = 1, max = 100), custom(function = "crate::models::not_blank"))]
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: ModelType,
    #[validate(range(min = 1, max = 120))]
    pub age: i32,
    #[serde(alias = "ethinicity")]
    pub ethnicity: Ethnicity,
    pub eye_color: EyeColor,
    pub bald: bool,
    #[validate(url)]
    pub zip_url: String,
}

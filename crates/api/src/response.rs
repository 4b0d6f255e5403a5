//! Response bodies shared by the API handlers.
//!
//! Field names are camelCase on the wire.

use photoai_core::types::DbId;
use photoai_db::models::model::Model;
use photoai_db::models::output_image::OutputImage;
use photoai_db::models::pack::Pack;
use photoai_pipeline::CompletionOutcome;
use serde::Serialize;

/// `POST /ai/training`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelIdResponse {
    pub model_id: DbId,
}

/// `POST /ai/generate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageIdResponse {
    pub image_id: DbId,
}

/// `POST /pack/generate`: created image ids in prompt order.
#[derive(Debug, Serialize)]
pub struct ImageIdsResponse {
    pub images: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct PacksResponse {
    pub packs: Vec<Pack>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<OutputImage>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<Model>,
}

/// Acknowledgement returned to the provider for every accepted webhook.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub message: &'static str,
    pub outcome: &'static str,
    pub updated: u64,
}

impl From<CompletionOutcome> for WebhookAck {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            message: "Webhook received",
            outcome: outcome.as_str(),
            updated: outcome.updated(),
        }
    }
}

//! Provider completion webhooks.
//!
//! fal.ai calls these when a queued job finishes. The body is read raw so
//! the optional HMAC signature is checked over the exact bytes received.
//! Two body shapes are accepted: a flat one carrying `tensor_path` or
//! `image_url` next to `request_id`, and fal's native envelope where the
//! result sits under `payload`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use photoai_core::error::CoreError;
use photoai_db::models::completion::JobKind;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::signature::verify_webhook;
use crate::response::WebhookAck;
use crate::state::AppState;

/// Provider status value marking a failed job.
const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Deserialize)]
struct WebhookBody {
    request_id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tensor_path: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    payload: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl WebhookBody {
    fn parse(raw: &[u8]) -> Result<Self, CoreError> {
        let body: Self = serde_json::from_slice(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid webhook body: {e}")))?;
        if body.request_id.trim().is_empty() {
            return Err(CoreError::Validation("request_id must not be empty".into()));
        }
        Ok(body)
    }

    fn is_error(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(STATUS_ERROR))
    }

    fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Trained asset path: flat `tensor_path`, else
    /// `payload.diffusers_lora_file.url`.
    fn tensor_path(&self) -> Option<String> {
        self.tensor_path.clone().or_else(|| {
            self.payload
                .as_ref()?
                .pointer("/diffusers_lora_file/url")?
                .as_str()
                .map(str::to_string)
        })
    }

    /// Image URL: flat `image_url`, else `payload.images[0].url`.
    fn image_url(&self) -> Option<String> {
        self.image_url.clone().or_else(|| {
            self.payload
                .as_ref()?
                .pointer("/images/0/url")?
                .as_str()
                .map(str::to_string)
        })
    }
}

/// POST /fal-ai/webhook/train
pub async fn training_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    verify_webhook(&state, &headers, &body)?;
    let body = WebhookBody::parse(&body)?;

    let outcome = if body.is_error() {
        state.pipeline.record_provider_error(
            JobKind::Training,
            &body.request_id,
            body.error_detail().as_deref(),
        )
    } else {
        let tensor_path = body.tensor_path().ok_or_else(|| {
            CoreError::Validation("Training webhook carries no tensor_path".into())
        })?;
        state
            .pipeline
            .complete_training(&body.request_id, &tensor_path)
            .await?
    };

    tracing::info!(
        request_id = %body.request_id,
        outcome = outcome.as_str(),
        updated = outcome.updated(),
        "Training webhook handled",
    );
    Ok(Json(outcome.into()))
}

/// POST /fal-ai/webhook/image
pub async fn image_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    verify_webhook(&state, &headers, &body)?;
    let body = WebhookBody::parse(&body)?;

    let outcome = if body.is_error() {
        state.pipeline.record_provider_error(
            JobKind::Image,
            &body.request_id,
            body.error_detail().as_deref(),
        )
    } else {
        let image_url = body
            .image_url()
            .ok_or_else(|| CoreError::Validation("Image webhook carries no image_url".into()))?;
        state
            .pipeline
            .complete_image(&body.request_id, &image_url)
            .await?
    };

    tracing::info!(
        request_id = %body.request_id,
        outcome = outcome.as_str(),
        updated = outcome.updated(),
        "Image webhook handled",
    );
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> WebhookBody {
        WebhookBody::parse(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn flat_fields_are_read() {
        let body = parse(serde_json::json!({
            "request_id": "r1",
            "tensor_path": "path/a",
            "image_url": "https://cdn/a.png",
        }));
        assert_eq!(body.tensor_path().as_deref(), Some("path/a"));
        assert_eq!(body.image_url().as_deref(), Some("https://cdn/a.png"));
        assert!(!body.is_error());
    }

    #[test]
    fn fal_envelope_is_read() {
        let body = parse(serde_json::json!({
            "request_id": "r1",
            "status": "OK",
            "payload": {
                "diffusers_lora_file": { "url": "https://fal/lora.safetensors" },
                "images": [{ "url": "https://fal/0.png" }, { "url": "https://fal/1.png" }],
            },
        }));
        assert_eq!(body.tensor_path().as_deref(), Some("https://fal/lora.safetensors"));
        assert_eq!(body.image_url().as_deref(), Some("https://fal/0.png"));
    }

    #[test]
    fn error_status_is_detected() {
        let body = parse(serde_json::json!({
            "request_id": "r1",
            "status": "ERROR",
            "error": "Invalid status code: 422",
        }));
        assert!(body.is_error());
        assert_eq!(body.error_detail().as_deref(), Some("Invalid status code: 422"));
        assert!(body.tensor_path().is_none());
    }

    #[test]
    fn missing_or_blank_request_id_is_invalid() {
        assert!(WebhookBody::parse(br#"{"tensor_path": "a"}"#).is_err());
        assert!(WebhookBody::parse(br#"{"request_id": "  "}"#).is_err());
        assert!(WebhookBody::parse(b"not json").is_err());
    }
}

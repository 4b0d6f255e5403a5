//! Webhook signature check.

use axum::http::HeaderMap;
use photoai_core::error::CoreError;
use photoai_core::signing::{verify_webhook_signature, WEBHOOK_SIGNATURE_HEADER};

use crate::error::AppError;
use crate::state::AppState;

/// Verify the HMAC signature of a webhook body when a secret is configured.
///
/// With no secret every body is accepted.
pub fn verify_webhook(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let Some(secret) = state.config.webhook_secret.as_deref() else {
        return Ok(());
    };

    let header = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    verify_webhook_signature(secret, body, header).map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature rejected");
        AppError::Core(CoreError::Unauthorized("Invalid webhook signature".into()))
    })
}

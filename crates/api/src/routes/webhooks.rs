//! Provider callbacks. Not behind bearer auth; optionally HMAC-signed.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/fal-ai/webhook`.
///
/// ```text
/// POST   /train    -> training_webhook
/// POST   /image    -> image_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/train", post(webhooks::training_webhook))
        .route("/image", post(webhooks::image_webhook))
}

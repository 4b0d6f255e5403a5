//! Route definitions for `/ai`. All endpoints require authentication.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST   /training    -> train_model
/// POST   /generate    -> generate_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/training", post(ai::train_model))
        .route("/generate", post(ai::generate_image))
}

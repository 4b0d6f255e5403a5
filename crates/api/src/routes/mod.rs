pub mod ai;
pub mod health;
pub mod images;
pub mod models;
pub mod packs;
pub mod uploads;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the route tree.
///
/// ```text
/// /health                    service + database health (public)
/// /pre-signed-url            presigned archive upload (public)
///
/// /ai/training               queue LoRA training (auth)
/// /ai/generate               queue one image (auth)
///
/// /pack/generate             queue one image per pack prompt (auth)
/// /pack/bulk                 list packs (public)
///
/// /image/bulk                list the caller's images (auth)
/// /models                    list owned + open models (auth)
///
/// /fal-ai/webhook/train      training completion (provider)
/// /fal-ai/webhook/image      image completion (provider)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(uploads::router())
        .nest("/ai", ai::router())
        .nest("/pack", packs::router())
        .nest("/image", images::router())
        .merge(models::router())
        .nest("/fal-ai/webhook", webhooks::router())
}

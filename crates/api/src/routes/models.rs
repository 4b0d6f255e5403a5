use axum::routing::get;
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/models", get(models::list_models))
}

use axum::routing::get;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// ```text
/// GET    /pre-signed-url    -> presigned_url
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/pre-signed-url", get(uploads::presigned_url))
}

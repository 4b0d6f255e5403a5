use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/image`.
///
/// ```text
/// GET    /bulk    -> list_images (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bulk", get(images::list_images))
}

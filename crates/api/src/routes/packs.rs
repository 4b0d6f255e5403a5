use axum::routing::{get, post};
use axum::Router;

use crate::handlers::packs;
use crate::state::AppState;

/// Routes mounted at `/pack`.
///
/// ```text
/// POST   /generate    -> generate_pack (auth)
/// GET    /bulk        -> list_packs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(packs::generate_pack))
        .route("/bulk", get(packs::list_packs))
}

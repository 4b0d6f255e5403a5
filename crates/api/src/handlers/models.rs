use axum::extract::State;
use axum::Json;
use photoai_db::repositories::ModelRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ModelsResponse;
use crate::state::AppState;

/// GET /models
///
/// The caller's models plus every open model, each listed once.
pub async fn list_models(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ModelsResponse>> {
    let models = ModelRepo::list_visible(&state.pool, &auth.user_id).await?;
    Ok(Json(ModelsResponse { models }))
}

use axum::extract::State;
use axum::Json;
use photoai_db::models::output_image::GeneratePackRequest;
use photoai_db::repositories::PackRepo;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ImageIdsResponse, PacksResponse};
use crate::state::AppState;

/// POST /pack/generate
///
/// Queue one image per prompt of the pack. All or nothing: when any
/// submission fails no image is created.
pub async fn generate_pack(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GeneratePackRequest>,
) -> AppResult<Json<ImageIdsResponse>> {
    let images = state.pipeline.submit_pack(&auth.user_id, &input).await?;
    Ok(Json(ImageIdsResponse {
        images: images.into_iter().map(|image| image.id).collect(),
    }))
}

/// GET /pack/bulk
pub async fn list_packs(State(state): State<AppState>) -> AppResult<Json<PacksResponse>> {
    let packs = PackRepo::list(&state.pool).await?;
    Ok(Json(PacksResponse { packs }))
}

use axum::extract::{Query, State};
use axum::Json;
use photoai_core::pagination::{
    clamp_limit, clamp_offset, parse_id_list, DEFAULT_IMAGE_LIMIT, MAX_IMAGE_LIMIT,
};
use photoai_db::models::output_image::ImageBulkQuery;
use photoai_db::repositories::OutputImageRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ImagesResponse;
use crate::state::AppState;

/// GET /image/bulk?ids=1,2,3&limit=&offset=
///
/// The caller's images, newest first. `ids` narrows the result to the
/// listed images; ids belonging to other users are silently skipped.
pub async fn list_images(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ImageBulkQuery>,
) -> AppResult<Json<ImagesResponse>> {
    let ids = params.ids.as_deref().map(parse_id_list).transpose()?;
    let limit = clamp_limit(params.limit, DEFAULT_IMAGE_LIMIT, MAX_IMAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let images =
        OutputImageRepo::list_for_user(&state.pool, &auth.user_id, ids.as_deref(), limit, offset)
            .await?;
    Ok(Json(ImagesResponse { images }))
}

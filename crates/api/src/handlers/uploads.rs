use axum::extract::State;
use axum::Json;
use photoai_storage::PresignedUpload;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /pre-signed-url
///
/// Issue a presigned PUT URL for a training archive. The client uploads the
/// zip directly and later submits the bucket URL as `zipUrl`.
pub async fn presigned_url(State(state): State<AppState>) -> AppResult<Json<PresignedUpload>> {
    let upload = state.uploads.presign_upload().await?;
    Ok(Json(upload))
}

//! Upload signature endpoint

use axum::Json;
use axum::extract::State;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::UploadSignature;

/// GET /api/upload-signature - short-lived client upload permission
pub async fn signature(State(state): State<AppState>) -> ApiResult<Json<UploadSignature>> {
    let issued = state
        .upload_signer
        .issue()
        .map_err(|e| ApiError::internal(format!("upload signing failed: {e}")))?;
    Ok(Json(issued))
}

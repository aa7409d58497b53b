//! Admin account management
//!
//! Listing is admin-visible; the mutating routes (revocation watermark,
//! disabled flag) sit behind the superadmin floor in the router.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::UserSummary;
use crate::state::AppState;

/// GET /api/admin/users - staff accounts, no credentials
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let rows = db::users::list_staff(&state.pool).await?;
    let users: Vec<UserSummary> = rows.into_iter().map(UserSummary::from).collect();
    Ok(Json(json!({ "users": users })))
}

/// POST /api/admin/users/{uid}/revoke - invalidate outstanding tokens
///
/// Bumps the subject's revocation watermark; tokens issued before this
/// instant fail verification from the next request on.
pub async fn revoke(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<Value>> {
    db::users::revoke_tokens(&state.pool, &uid).await?;
    tracing::info!(uid = %uid, "Tokens revoked");
    Ok(Json(json!({ "uid": uid, "revoked": true })))
}

#[derive(Debug, Deserialize)]
pub struct DisabledUpdate {
    pub disabled: bool,
}

/// PATCH /api/admin/users/{uid}/disabled - set or clear the disabled flag
pub async fn set_disabled(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<DisabledUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Ok(Json(payload)) = body else {
        return Err(ApiError::validation("disabled must be a boolean"));
    };

    db::users::set_disabled(&state.pool, &uid, payload.disabled).await?;
    tracing::info!(uid = %uid, disabled = payload.disabled, "Disabled flag updated");
    Ok(Json(json!({ "uid": uid, "disabled": payload.disabled })))
}

//! Login endpoint
//!
//! Exchanges email + password for a bearer token with the role claims
//! baked in at signing time.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::util;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Ok(Json(req)) = body else {
        return Err(ApiError::validation("Invalid payload"));
    };
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email).await?;

    // Fixed delay before inspecting the result, so the unknown-email path
    // takes as long as the known-email one.
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let Some(user) = user else {
        tracing::warn!(email = %email, "Login failed - unknown email");
        return Err(ApiError::unauthorized("invalid credentials"));
    };

    if user.disabled {
        tracing::warn!(uid = %user.uid, "Login refused - account disabled");
        return Err(ApiError::unauthorized("account disabled"));
    }

    if !util::verify_password(&req.password, &user.password_hash) {
        tracing::warn!(uid = %user.uid, "Login failed - invalid credentials");
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = state.tokens.issue(&user)?;
    let role = match (user.is_superadmin, user.is_admin) {
        (true, _) => Some("superadmin"),
        (_, true) => Some("admin"),
        _ => None,
    };

    tracing::info!(uid = %user.uid, "Login succeeded");

    Ok(Json(json!({
        "token": token,
        "uid": user.uid,
        "role": role,
    })))
}

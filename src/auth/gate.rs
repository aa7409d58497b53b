//! Authorization gate
//!
//! The single gate every protected route composes with. Three floors:
//!
//! - [`require_auth`]: any verified subject (order submission).
//! - [`require_admin`]: subject whose claims carry `admin` or `superadmin`.
//! - [`require_superadmin`]: layered inside an admin scope for the
//!   account-management routes.
//!
//! The gate runs after the origin policy (preflight never reaches it) and
//! attaches [`CurrentUser`] to the request extensions on success. Its
//! failures render through [`ApiError`] like every other error.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;

use crate::auth::token::{AuthError, Claims, TokenService};
use crate::error::ApiError;
use crate::state::AppState;

/// Derived role. Superadmin implies admin-level access and is reported as
/// the more specific value when both claims are true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Superadmin,
}

impl Role {
    pub fn from_claims(claims: &Claims) -> Option<Role> {
        if claims.superadmin {
            Some(Role::Superadmin)
        } else if claims.admin {
            Some(Role::Admin)
        } else {
            None
        }
    }
}

/// Verified identity attached to the request by the gate. Lives for one
/// request; never persisted.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub uid: String,
    pub email: Option<String>,
    /// None for authenticated customers without a staff role
    pub role: Option<Role>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            role: Role::from_claims(&claims),
            uid: claims.sub,
            email: claims.email,
        }
    }
}

/// Extract the bearer token. A missing header, a non-Bearer scheme and an
/// empty token all count as missing, before any verification work.
fn bearer_token(request: &Request) -> Result<&str, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    match TokenService::extract_from_header(header) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken.into()),
    }
}

/// Require a verified, non-revoked subject. Any authenticated account
/// passes; no role floor.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;
    let claims = state.tokens.verify(&state.pool, token).await?;
    request.extensions_mut().insert(CurrentUser::from(claims));
    Ok(next.run(request).await)
}

/// Admin floor: admin or superadmin claim required once verification has
/// passed.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;
    let claims = state.tokens.verify(&state.pool, token).await?;
    let user = CurrentUser::from(claims);
    if user.role.is_none() {
        return Err(ApiError::forbidden("insufficient permissions"));
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Superadmin floor. Layered inside an admin scope, so the extension is
/// already present.
pub async fn require_superadmin(request: Request, next: Next) -> Result<Response, ApiError> {
    let authorized = request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(|user| user.role == Some(Role::Superadmin));
    if !authorized {
        return Err(ApiError::forbidden("superadmin role required"));
    }
    Ok(next.run(request).await)
}

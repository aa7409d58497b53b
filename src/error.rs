//! API error taxonomy
//!
//! Every failure a handler or middleware can produce maps onto one of these
//! variants, and every variant maps onto exactly one HTTP status. The
//! boundary renders all of them as `{ "error": message }` JSON so clients
//! see one uniform failure contract.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Missing, malformed, invalid or revoked credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid credential, insufficient role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Origin absent or not in the allow-list
    #[error("CORS: origin not allowed")]
    BadOrigin,

    /// Malformed request payload
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Store or provider failure; the cause is logged, never surfaced
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadOrigin => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(cause) = &self {
            tracing::error!(%cause, "internal error");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<crate::db::RepoError> for ApiError {
    fn from(err: crate::db::RepoError) -> Self {
        use crate::db::RepoError;
        match err {
            RepoError::NotFound(resource) => Self::NotFound(resource),
            RepoError::Duplicate(msg) => Self::Validation(msg),
            RepoError::Database(msg) => Self::Internal(msg),
        }
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        use crate::auth::AuthError;
        match err {
            AuthError::MissingToken => Self::unauthorized("missing bearer token"),
            // store/provider faults are not credential problems
            AuthError::Lookup(msg) | AuthError::GenerationFailed(msg) => Self::Internal(msg),
            _ => Self::unauthorized("invalid or revoked token"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::unauthorized("missing bearer token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("insufficient permissions").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::BadOrigin.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::validation("items is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Product").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::internal("db down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::unauthorized("missing bearer token").to_string(),
            "Unauthorized: missing bearer token"
        );
        assert_eq!(
            ApiError::forbidden("insufficient permissions").to_string(),
            "Forbidden: insufficient permissions"
        );
        assert_eq!(ApiError::BadOrigin.to_string(), "CORS: origin not allowed");
        assert_eq!(
            ApiError::not_found("Product").to_string(),
            "Product not found"
        );
    }

    #[test]
    fn test_internal_never_leaks_cause() {
        let err = ApiError::internal("connection refused at 10.0.0.3");
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_repo_error_classification() {
        use crate::db::RepoError;

        let err: ApiError = RepoError::NotFound("Product".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Product not found");

        let err: ApiError = RepoError::Duplicate("email already registered".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "email already registered");

        let err: ApiError = RepoError::Database("disk I/O error".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_auth_error_classification() {
        use crate::auth::AuthError;

        let err: ApiError = AuthError::MissingToken.into();
        assert_eq!(err.to_string(), "Unauthorized: missing bearer token");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        for auth_err in [
            AuthError::ExpiredToken,
            AuthError::InvalidSignature,
            AuthError::Revoked,
            AuthError::Disabled,
            AuthError::UnknownSubject,
        ] {
            let err: ApiError = auth_err.into();
            assert_eq!(err.to_string(), "Unauthorized: invalid or revoked token");
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }

        let err: ApiError = AuthError::Lookup("io error".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

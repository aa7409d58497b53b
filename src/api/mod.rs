//! API routes
//!
//! Route map:
//!
//! - `/health`: liveness, outside the origin policy
//! - `/api/auth/login`, `/api/upload-signature`: origin policy only
//! - `/api/orders`: any authenticated subject
//! - `/api/admin/*`: admin role; account management raises the floor to
//!   superadmin
//!
//! Every `/api` route passes the origin policy before anything else, so
//! preflight terminates there and a disallowed origin never reaches a
//! handler. The method-not-allowed fallbacks are registered before the
//! auth layers, so a wrong-method request still clears the origin policy
//! and the credential gate before the 405.

pub mod categories;
pub mod health;
pub mod login;
pub mod orders;
pub mod products;
pub mod subcategories;
pub mod upload;
pub mod users;

use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{Value, json};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{require_admin, require_auth, require_superadmin};
use crate::cors::enforce_origin;
use crate::error::ApiError;
use crate::state::AppState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Loose truthiness for open-document fields: null, false, zero and the
/// empty string all read as absent. Gates the optional handling of
/// `variants` and `shippingData`.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Account management (superadmin floor, layered inside the admin gate)
    let accounts = Router::new()
        .route("/api/admin/users/{uid}/revoke", post(users::revoke))
        .route("/api/admin/users/{uid}/disabled", patch(users::set_disabled))
        .layer(middleware::from_fn(require_superadmin));

    // Admin catalog + staff listing
    let admin = Router::new()
        .route(
            "/api/admin/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/admin/categories/{id}",
            patch(categories::update).delete(categories::delete),
        )
        .route(
            "/api/admin/subcategories",
            get(subcategories::list).post(subcategories::create),
        )
        .route("/api/admin/subcategories/{id}", delete(subcategories::delete))
        .route(
            "/api/admin/products",
            get(products::list).post(products::create),
        )
        .route(
            "/api/admin/products/{id}",
            get(products::get_by_id)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/api/admin/users", get(users::list))
        .merge(accounts)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Order submission (any verified subject)
    let orders = Router::new()
        .route("/api/orders", post(orders::create))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Credential exchange and upload signing (origin policy only)
    let open = Router::new()
        .route("/api/auth/login", post(login::login))
        .route("/api/upload-signature", get(upload::signature))
        .method_not_allowed_fallback(method_not_allowed);

    let api = Router::new()
        .merge(admin)
        .merge(orders)
        .merge(open)
        .layer(middleware::from_fn_with_state(state.clone(), enforce_origin));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .fallback(not_found)
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}

//! Cross-origin policy
//!
//! Browser-facing routes only answer to origins on the configured
//! allow-list. An empty list allows nothing, and a disallowed or absent
//! origin gets the literal `null` in `Access-Control-Allow-Origin` plus,
//! outside preflight, a hard 403 before any business logic runs. Preflight
//! always succeeds so the browser can read the verdict from the headers
//! instead of a network error.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue, ORIGIN, VARY,
};
use http::{HeaderMap, Method, StatusCode};

use crate::error::ApiError;
use crate::state::AppState;

pub const ALLOWED_METHODS: &str = "GET,POST,PATCH,PUT,DELETE,OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type,Authorization";

/// Exact-match origin allow-list, loaded once at startup and immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// First `Origin` header value; proxies occasionally stack several.
    pub fn normalize(headers: &HeaderMap) -> Option<&str> {
        headers
            .get_all(ORIGIN)
            .iter()
            .next()
            .and_then(|value| value.to_str().ok())
    }

    /// Exact string membership. No origin, or an empty allow-list, is never
    /// allowed.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
            None => false,
        }
    }

    /// Set the CORS response headers: the origin echoed back verbatim when
    /// allowed, the literal `null` sentinel otherwise.
    pub fn apply(&self, origin: Option<&str>, headers: &mut HeaderMap) {
        let allow_origin = match origin {
            Some(origin) if self.is_allowed(Some(origin)) => origin,
            _ => "null",
        };
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_str(allow_origin).unwrap_or(HeaderValue::from_static("null")),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
}

/// Origin policy middleware. Runs ahead of authorization on every `/api`
/// route: preflight terminates here with 200, a disallowed origin with 403,
/// and every response that passes through picks up the CORS headers.
pub async fn enforce_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = OriginPolicy::normalize(request.headers()).map(str::to_owned);
    let origin = origin.as_deref();
    let policy = &state.origin_policy;

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        policy.apply(origin, response.headers_mut());
        return response;
    }

    if !policy.is_allowed(origin) {
        let mut response = ApiError::BadOrigin.into_response();
        policy.apply(origin, response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(origin, response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OriginPolicy {
        OriginPolicy::new(vec![
            "https://shop.example.com".to_string(),
            "https://www.shop.example.com".to_string(),
        ])
    }

    #[test]
    fn test_exact_match_only() {
        let policy = policy();
        assert!(policy.is_allowed(Some("https://shop.example.com")));
        assert!(!policy.is_allowed(Some("https://shop.example.com/")));
        assert!(!policy.is_allowed(Some("http://shop.example.com")));
        assert!(!policy.is_allowed(Some("https://evil.example.com")));
        assert!(!policy.is_allowed(None));
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        let policy = OriginPolicy::new(Vec::new());
        assert!(!policy.is_allowed(Some("https://shop.example.com")));
        assert!(!policy.is_allowed(None));
    }

    #[test]
    fn test_apply_echoes_allowed_origin() {
        let policy = policy();
        let mut headers = HeaderMap::new();
        policy.apply(Some("https://shop.example.com"), &mut headers);
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://shop.example.com"
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            ALLOWED_METHODS
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            ALLOWED_HEADERS
        );
        assert_eq!(headers.get(VARY).unwrap(), "Origin");
    }

    #[test]
    fn test_apply_emits_null_sentinel_when_disallowed() {
        let policy = policy();

        let mut headers = HeaderMap::new();
        policy.apply(Some("https://evil.example.com"), &mut headers);
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "null");

        let mut headers = HeaderMap::new();
        policy.apply(None, &mut headers);
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "null");
    }

    #[test]
    fn test_normalize_collapses_to_first_origin() {
        let mut headers = HeaderMap::new();
        headers.append(ORIGIN, HeaderValue::from_static("https://first.example"));
        headers.append(ORIGIN, HeaderValue::from_static("https://second.example"));
        assert_eq!(
            OriginPolicy::normalize(&headers),
            Some("https://first.example")
        );
    }

    #[test]
    fn test_normalize_absent_origin() {
        assert_eq!(OriginPolicy::normalize(&HeaderMap::new()), None);
    }
}

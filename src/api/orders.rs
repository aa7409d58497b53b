//! Order submission
//!
//! Orders are open documents validated just enough to be billable: a
//! non-empty `items` array, a usable total, and coherent shipping data
//! when any is attached. The stored document is the payload as submitted
//! with `uid` always overwritten from the verified token; client-sent
//! uids are never trusted.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use http::StatusCode;
use serde_json::{Map, Value, json};

use super::is_truthy;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn non_blank_string(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn validate_order(doc: &Map<String, Value>) -> Result<(), ApiError> {
    let items_ok = doc
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty());
    if !items_ok {
        return Err(ApiError::validation(
            "items is required and must be a non-empty array",
        ));
    }

    // totalUSD with total as the fallback; a null totalUSD falls through
    let total = match doc.get("totalUSD") {
        Some(v) if !v.is_null() => Some(v),
        _ => doc.get("total"),
    };
    let total_ok = total.and_then(Value::as_f64).is_some_and(|t| t >= 0.0);
    if !total_ok {
        return Err(ApiError::validation(
            "totalUSD or total is required and must be a valid number >= 0",
        ));
    }

    // shippingData is optional; a falsy value is stored verbatim
    if let Some(shipping) = doc.get("shippingData") {
        if is_truthy(shipping) {
            match shipping {
                Value::Object(map) => {
                    if map.contains_key("name") && !non_blank_string(map.get("name")) {
                        return Err(ApiError::validation(
                            "shippingData.name is required if shippingData is provided",
                        ));
                    }
                    if map.contains_key("address") && !non_blank_string(map.get("address")) {
                        return Err(ApiError::validation(
                            "shippingData.address is required if shippingData is provided",
                        ));
                    }
                }
                // arrays carry no shipping keys to check
                Value::Array(_) => {}
                _ => {
                    return Err(ApiError::validation("shippingData must be an object"));
                }
            }
        }
    }

    Ok(())
}

/// POST /api/orders - submit an order for the authenticated subject
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let Value::Object(doc) = payload else {
        return Err(ApiError::validation("Invalid payload"));
    };

    validate_order(&doc)?;

    let id = db::orders::create(&state.pool, &user.uid, doc).await?;
    tracing::info!(order_id = %id, uid = %user.uid, "Order created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

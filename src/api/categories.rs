//! Category API handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use http::StatusCode;
use serde_json::{Value, json};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, CategoryCreate, CategoryUpdate};
use crate::state::AppState;

/// GET /api/admin/categories - list all categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let rows = db::categories::list(&state.pool).await?;
    let categories: Vec<Category> = rows.into_iter().map(Category::from).collect();
    Ok(Json(json!({ "categories": categories })))
}

/// POST /api/admin/categories - create a category
///
/// `name.es` is the primary locale and must be non-blank; `name.en`
/// defaults to the empty string. An unreadable body falls through to the
/// field validation, like an empty one.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CategoryCreate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = body.map(|Json(p)| p).unwrap_or_default();

    let name = payload.name.unwrap_or_default();
    let es = name.es.as_deref().map(str::trim).unwrap_or("");
    if es.is_empty() {
        return Err(ApiError::validation("name.es is required"));
    }
    let en = name.en.as_deref().map(str::trim).unwrap_or("");

    let id = db::categories::create(&state.pool, es, en).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "created": true })),
    ))
}

/// PATCH /api/admin/categories/{id} - partial name update
///
/// Locales not present in the patch keep their stored value; the merged
/// `name.es` may not end up blank.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Ok(Json(payload)) = body else {
        return Err(ApiError::validation("Invalid payload"));
    };

    let current = db::categories::get(&state.pool, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    let Some(patch) = payload.name else {
        return Err(ApiError::validation("No valid fields to update"));
    };

    let es = match patch.es.as_deref() {
        Some(es) => es.trim().to_string(),
        None => current.name_es,
    };
    if es.is_empty() {
        return Err(ApiError::validation("name.es cannot be empty"));
    }
    let en = match patch.en.as_deref() {
        Some(en) => en.trim().to_string(),
        None => current.name_en,
    };

    let updated = db::categories::update_name(&state.pool, &id, &es, &en).await?;
    if !updated {
        return Err(ApiError::not_found("Category"));
    }
    Ok(Json(json!({ "id": id, "updated": true })))
}

/// DELETE /api/admin/categories/{id} - blind delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    db::categories::delete(&state.pool, &id).await?;
    Ok(Json(json!({ "id": id, "deleted": true })))
}

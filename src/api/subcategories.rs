//! Subcategory API handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{Subcategory, SubcategoryCreate};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub category_id: Option<String>,
}

/// GET /api/admin/subcategories - list, optionally filtered by categoryId
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let rows = db::subcategories::list(&state.pool, params.category_id.as_deref()).await?;
    let subcategories: Vec<Subcategory> = rows.into_iter().map(Subcategory::from).collect();
    Ok(Json(json!({ "subcategories": subcategories })))
}

/// POST /api/admin/subcategories - create under a category
///
/// No parent existence check: a subcategory may reference a category id
/// that is gone, exactly as a stale admin console would submit it.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<SubcategoryCreate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = body.map(|Json(p)| p).unwrap_or_default();

    let category_id = payload
        .category_id
        .as_deref()
        .map(str::trim)
        .unwrap_or("");
    if category_id.is_empty() {
        return Err(ApiError::validation("categoryId is required"));
    }
    let name = payload.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err(ApiError::validation("name is required"));
    }

    let id = db::subcategories::create(&state.pool, category_id, name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "created": true })),
    ))
}

/// DELETE /api/admin/subcategories/{id}?categoryId=... - blind delete
///
/// `categoryId` is part of the route contract and must be present, but the
/// delete goes by id alone; the parameter is never checked against the row.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    if params.category_id.as_deref().is_none_or(str::is_empty) {
        return Err(ApiError::validation("Missing categoryId query parameter"));
    }

    db::subcategories::delete(&state.pool, &id).await?;
    Ok(Json(json!({ "id": id, "deleted": true })))
}

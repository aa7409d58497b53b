//! Product API handlers
//!
//! Products are open documents: the admin console owns the shape, the
//! server normalizes `variants` on every write and maintains the derived
//! `priceUSD` / `stockTotal` fields. PATCH is a top-level key merge.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use http::StatusCode;
use serde_json::{Map, Value, json};

use super::is_truthy;
use crate::db;
use crate::db::products::ProductRow;
use crate::error::{ApiError, ApiResult};
use crate::models::{VariantInput, normalize_variants};
use crate::state::AppState;

/// Document as served: stored keys plus `id` and the row timestamps. The
/// timestamps are column-backed and overwrite any client-sent copy.
fn product_json(row: ProductRow) -> ApiResult<Value> {
    let mut doc = row.document()?;
    doc.entry("id".to_string()).or_insert(json!(row.id));
    doc.insert("createdAt".to_string(), json!(row.created_at));
    doc.insert("updatedAt".to_string(), json!(row.updated_at));
    Ok(Value::Object(doc))
}

/// Normalize a truthy `variants` value in place and refresh the derived
/// fields. A falsy value is stored verbatim like any other key; `priceUSD`
/// is written only when a finite minimum exists, so an unusable price set
/// leaves any stored price untouched. `stockTotal` is always written.
fn apply_variant_normalization(doc: &mut Map<String, Value>) -> ApiResult<()> {
    let Some(raw) = doc.get("variants") else {
        return Ok(());
    };
    if !is_truthy(raw) {
        return Ok(());
    }
    let Value::Array(items) = raw else {
        return Err(ApiError::validation("variants must be an array"));
    };

    // Elements that fail to parse contribute an empty variant rather than
    // failing the request; normalization is lenient end to end.
    let inputs: Vec<VariantInput> = items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect();
    let normalized = normalize_variants(inputs);

    let variants = serde_json::to_value(&normalized.variants)
        .map_err(|e| ApiError::internal(format!("variant encode failed: {e}")))?;
    doc.insert("variants".to_string(), variants);
    if let Some(price) = normalized.price_usd {
        doc.insert("priceUSD".to_string(), json!(price));
    }
    doc.insert("stockTotal".to_string(), json!(normalized.stock_total));
    Ok(())
}

/// GET /api/admin/products - list all products
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let rows = db::products::list(&state.pool).await?;
    let products = rows
        .into_iter()
        .map(product_json)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(json!({ "products": products })))
}

/// GET /api/admin/products/{id} - fetch one product
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let row = db::products::get(&state.pool, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(Json(json!({ "product": product_json(row)? })))
}

/// POST /api/admin/products - create a product document
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let Value::Object(mut doc) = payload else {
        return Err(ApiError::validation("Invalid payload"));
    };

    apply_variant_normalization(&mut doc)?;

    let id = db::products::create(&state.pool, &doc).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "created": true })),
    ))
}

/// PATCH /api/admin/products/{id} - top-level merge update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let payload = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let Value::Object(mut patch) = payload else {
        return Err(ApiError::validation("Invalid payload"));
    };

    apply_variant_normalization(&mut patch)?;

    let updated = db::products::update_merge(&state.pool, &id, patch).await?;
    if !updated {
        return Err(ApiError::not_found("Product"));
    }
    Ok(Json(json!({ "id": id, "updated": true })))
}

/// DELETE /api/admin/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let deleted = db::products::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(ApiError::not_found("Product"));
    }
    Ok(Json(json!({ "id": id, "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_normalization_rewrites_variants_and_derived_fields() {
        let mut patch = doc(json!({
            "title": {"es": "Camiseta"},
            "priceUSD": 99,
            "variants": [
                {"label": {"es": "Talla"}, "options": [
                    {"value": " S ", "priceUSD": "10", "stock": 2},
                    {"value": "M", "priceUSD": 4, "stock": 3}
                ]}
            ]
        }));
        apply_variant_normalization(&mut patch).unwrap();

        assert_eq!(patch["priceUSD"], json!(4.0));
        assert_eq!(patch["stockTotal"], json!(5));
        assert_eq!(patch["variants"][0]["options"][0]["value"], json!("S"));
        assert_eq!(patch["variants"][0]["options"][0]["priceUSD"], json!(10.0));
        // untouched keys survive the merge shape
        assert_eq!(patch["title"]["es"], json!("Camiseta"));
    }

    #[test]
    fn test_unusable_prices_leave_client_price_alone() {
        let mut patch = doc(json!({
            "priceUSD": 99,
            "variants": [{"options": [{"value": "A", "priceUSD": "abc", "stock": 1}]}]
        }));
        apply_variant_normalization(&mut patch).unwrap();

        // no finite minimum: the submitted priceUSD key is not overwritten
        assert_eq!(patch["priceUSD"], json!(99));
        assert_eq!(patch["stockTotal"], json!(1));
        assert!(patch["variants"][0]["options"][0].get("priceUSD").is_none());
    }

    #[test]
    fn test_empty_variant_array_still_writes_stock_total() {
        let mut patch = doc(json!({ "variants": [] }));
        apply_variant_normalization(&mut patch).unwrap();
        assert_eq!(patch["variants"], json!([]));
        assert_eq!(patch["stockTotal"], json!(0));
        assert!(patch.get("priceUSD").is_none());
    }

    #[test]
    fn test_falsy_variants_value_is_left_verbatim() {
        let mut patch = doc(json!({ "variants": null }));
        apply_variant_normalization(&mut patch).unwrap();
        assert_eq!(patch["variants"], json!(null));
        assert!(patch.get("stockTotal").is_none());
    }

    #[test]
    fn test_truthy_non_array_variants_rejected() {
        let mut patch = doc(json!({ "variants": "oops" }));
        let err = apply_variant_normalization(&mut patch).unwrap_err();
        assert_eq!(err.to_string(), "variants must be an array");
    }

    #[test]
    fn test_degenerate_options_keep_the_variant_label() {
        let mut patch = doc(json!({
            "variants": [{"label": {"es": "Talla", "en": "Size"}, "options": null}]
        }));
        apply_variant_normalization(&mut patch).unwrap();

        assert_eq!(patch["variants"][0]["label"]["es"], json!("Talla"));
        assert_eq!(patch["variants"][0]["options"], json!([]));
        assert_eq!(patch["stockTotal"], json!(0));
        assert!(patch.get("priceUSD").is_none());
    }
}

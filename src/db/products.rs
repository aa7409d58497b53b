//! Product repository
//!
//! Products are open documents: the admin console owns the shape, the
//! server owns the derived `priceUSD` / `stockTotal` fields. The whole
//! document lives in the `data` JSON column.

use super::{RepoError, RepoResult};
use crate::util;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Product row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub data: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProductRow {
    /// Decode the stored document.
    pub fn document(&self) -> RepoResult<Map<String, Value>> {
        match serde_json::from_str::<Value>(&self.data) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(RepoError::Database(format!(
                "corrupt product document {}",
                self.id
            ))),
        }
    }
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<ProductRow>> {
    let products = sqlx::query_as::<_, ProductRow>(
        "SELECT id, data, created_at, updated_at FROM products ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn get(pool: &SqlitePool, id: &str) -> RepoResult<Option<ProductRow>> {
    let product = sqlx::query_as::<_, ProductRow>(
        "SELECT id, data, created_at, updated_at FROM products WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn create(pool: &SqlitePool, doc: &Map<String, Value>) -> RepoResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = util::now_millis();
    sqlx::query("INSERT INTO products (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(&id)
        .bind(serde_json::to_string(doc).unwrap_or_else(|_| "{}".to_string()))
        .bind(now)
        .execute(pool)
        .await?;
    Ok(id)
}

/// Top-level key merge, matching document-store update semantics: provided
/// keys overwrite, everything else is untouched. Returns false when the
/// product does not exist.
pub async fn update_merge(
    pool: &SqlitePool,
    id: &str,
    patch: Map<String, Value>,
) -> RepoResult<bool> {
    let Some(row) = get(pool, id).await? else {
        return Ok(false);
    };
    let mut doc = row.document()?;
    for (key, value) in patch {
        doc.insert(key, value);
    }

    let now = util::now_millis();
    sqlx::query("UPDATE products SET data = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(serde_json::to_string(&doc).unwrap_or_else(|_| "{}".to_string()))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

//! Order repository
//!
//! Orders are stored as submitted (validated, `uid` overwritten from the
//! token), one JSON document per row with the uid indexed beside it.

use super::RepoResult;
use crate::util;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn create(pool: &SqlitePool, uid: &str, mut doc: Map<String, Value>) -> RepoResult<String> {
    doc.insert("uid".to_string(), Value::String(uid.to_string()));

    let id = Uuid::new_v4().to_string();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO orders (id, uid, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(&id)
    .bind(uid)
    .bind(serde_json::to_string(&doc).unwrap_or_else(|_| "{}".to_string()))
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

//! Category repository

use super::RepoResult;
use crate::models::CategoryRow;
use crate::util;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<CategoryRow>> {
    let categories = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name_es, name_en, created_at, updated_at FROM categories ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn get(pool: &SqlitePool, id: &str) -> RepoResult<Option<CategoryRow>> {
    let category = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name_es, name_en, created_at, updated_at FROM categories WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, name_es: &str, name_en: &str) -> RepoResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO categories (id, name_es, name_en, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(&id)
    .bind(name_es)
    .bind(name_en)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Overwrite both name locales. The caller resolves the merged value and
/// validates it first.
pub async fn update_name(
    pool: &SqlitePool,
    id: &str,
    name_es: &str,
    name_en: &str,
) -> RepoResult<bool> {
    let now = util::now_millis();
    let result = sqlx::query(
        "UPDATE categories SET name_es = ?1, name_en = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(name_es)
    .bind(name_en)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Blind delete: removing an id that does not exist is not an error.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM categories WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

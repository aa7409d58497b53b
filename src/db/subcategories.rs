//! Subcategory repository

use super::RepoResult;
use crate::models::SubcategoryRow;
use crate::util;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn list(pool: &SqlitePool, category_id: Option<&str>) -> RepoResult<Vec<SubcategoryRow>> {
    let subcategories = match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, SubcategoryRow>(
                "SELECT id, category_id, name, created_at, updated_at FROM subcategories WHERE category_id = ?1 ORDER BY created_at",
            )
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, SubcategoryRow>(
                "SELECT id, category_id, name, created_at, updated_at FROM subcategories ORDER BY created_at",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(subcategories)
}

pub async fn create(pool: &SqlitePool, category_id: &str, name: &str) -> RepoResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO subcategories (id, category_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(&id)
    .bind(category_id)
    .bind(name)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Blind delete: removing an id that does not exist is not an error.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM subcategories WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

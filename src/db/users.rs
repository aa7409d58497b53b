//! User repository

use super::{RepoError, RepoResult};
use crate::models::{UserCreate, UserRow};
use crate::util;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn find_by_uid(pool: &SqlitePool, uid: &str) -> RepoResult<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT uid, email, password_hash, display_name, is_admin, is_superadmin, disabled, tokens_valid_after, created_at, updated_at FROM users WHERE uid = ?1",
    )
    .bind(uid)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT uid, email, password_hash, display_name, is_admin, is_superadmin, disabled, tokens_valid_after, created_at, updated_at FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<UserRow> {
    let uid = Uuid::new_v4().to_string();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO users (uid, email, password_hash, display_name, is_admin, is_superadmin, disabled, tokens_valid_after, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, ?7)",
    )
    .bind(&uid)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.display_name)
    .bind(data.is_admin)
    .bind(data.is_superadmin)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserRow {
        uid,
        email: data.email,
        password_hash: data.password_hash,
        display_name: data.display_name,
        is_admin: data.is_admin,
        is_superadmin: data.is_superadmin,
        disabled: false,
        tokens_valid_after: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Staff accounts only, customers are not listed.
pub async fn list_staff(pool: &SqlitePool) -> RepoResult<Vec<UserRow>> {
    let users = sqlx::query_as::<_, UserRow>(
        "SELECT uid, email, password_hash, display_name, is_admin, is_superadmin, disabled, tokens_valid_after, created_at, updated_at FROM users WHERE is_admin = 1 OR is_superadmin = 1 ORDER BY email",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Move the revocation watermark to now: every token issued earlier dies.
pub async fn revoke_tokens(pool: &SqlitePool, uid: &str) -> RepoResult<()> {
    let now = util::now_millis();
    let result = sqlx::query("UPDATE users SET tokens_valid_after = ?1, updated_at = ?1 WHERE uid = ?2")
        .bind(now)
        .bind(uid)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound("User".to_string()));
    }
    Ok(())
}

pub async fn set_disabled(pool: &SqlitePool, uid: &str, disabled: bool) -> RepoResult<()> {
    let now = util::now_millis();
    let result = sqlx::query("UPDATE users SET disabled = ?1, updated_at = ?2 WHERE uid = ?3")
        .bind(disabled)
        .bind(now)
        .bind(uid)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound("User".to_string()));
    }
    Ok(())
}

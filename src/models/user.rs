//! User model
//!
//! One table covers staff and customers; staff carry the `admin` /
//! `superadmin` flags that end up as claims in issued tokens.

use serde::{Deserialize, Serialize};

/// User row, password hash included. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub is_superadmin: bool,
    pub disabled: bool,
    /// Millisecond watermark: tokens issued before this instant are revoked.
    pub tokens_valid_after: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User as listed to admins (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub admin: bool,
    pub superadmin: bool,
    pub disabled: bool,
    pub created_at: i64,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            uid: row.uid,
            email: row.email,
            display_name: row.display_name,
            admin: row.is_admin,
            superadmin: row.is_superadmin,
            disabled: row.disabled,
            created_at: row.created_at,
        }
    }
}

/// Create user data (provisioning)
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub is_superadmin: bool,
}

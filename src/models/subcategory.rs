//! Subcategory model

use serde::{Deserialize, Serialize};

/// Subcategory row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubcategoryRow {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Subcategory as served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<SubcategoryRow> for Subcategory {
    fn from(row: SubcategoryRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create subcategory payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryCreate {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

//! Category model

use serde::{Deserialize, Serialize};

/// Localized display name. `es` is the primary locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub es: String,
    pub en: String,
}

/// Category row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub name_es: String,
    pub name_en: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Category as served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: LocalizedName,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: LocalizedName {
                es: row.name_es,
                en: row.name_en,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create category payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryCreate {
    #[serde(default)]
    pub name: Option<LocalizedNamePatch>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<LocalizedNamePatch>,
}

/// Partial localized name, fields independently optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedNamePatch {
    #[serde(default)]
    pub es: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

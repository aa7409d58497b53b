//! Data models
//!
//! Row types derive `sqlx::FromRow`; API shapes serialize camelCase to match
//! the storefront clients. Products and orders are open JSON documents and
//! have no fixed row type beyond id + data.

pub mod category;
pub mod subcategory;
pub mod user;
pub mod variant;

// Re-exports
pub use category::*;
pub use subcategory::*;
pub use user::*;
pub use variant::*;

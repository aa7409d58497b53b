//! Storefront admin service
//!
//! HTTP backend for a storefront's admin console and checkout flow:
//!
//! - **Origin policy** (`cors`): exact-match allow-list, fail-closed
//! - **Authorization** (`auth`): HS256 bearer tokens with revocation state,
//!   one gate with admin and superadmin floors
//! - **Catalog** (`api`, `models`): categories, subcategories and open
//!   product documents with variant normalization and derived pricing
//! - **Orders** (`api::orders`): validated order intake, uid from the token
//! - **Upload signing** (`upload`): short-lived HMAC-SHA1 signatures

pub mod api;
pub mod auth;
pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
pub mod upload;
pub mod util;

// Re-export common types
pub use auth::{CurrentUser, Role, TokenService};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

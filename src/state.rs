//! Shared application state

use sqlx::SqlitePool;

use crate::auth::TokenService;
use crate::config::Config;
use crate::cors::OriginPolicy;
use crate::db::DbService;
use crate::upload::UploadSigner;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: TokenService,
    pub origin_policy: OriginPolicy,
    pub upload_signer: UploadSigner,
}

impl AppState {
    pub fn new(config: &Config, db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
            tokens: TokenService::new(&config.jwt_secret, config.session_ttl_minutes),
            origin_policy: OriginPolicy::new(config.allowed_origins.clone()),
            upload_signer: UploadSigner::new(
                config.upload_public_key.clone(),
                config.upload_private_key.clone(),
            ),
        }
    }
}

//! storefront-admin service entry point
//!
//! Long-running service that:
//! - Gates every `/api` route behind an exact-match origin policy
//! - Verifies bearer tokens, revocation state included, on each request
//! - Manages the catalog (categories, subcategories, product documents)
//! - Accepts storefront orders and signs client uploads

use storefront_admin::api;
use storefront_admin::config::Config;
use storefront_admin::db::DbService;
use storefront_admin::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting storefront-admin (env: {})", config.environment);

    if config.allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOW_ORIGIN is empty; every browser origin will be rejected");
    }

    let db = DbService::new(&config.database_path).await?;
    let state = AppState::new(&config, &db);
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("storefront-admin HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}

use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sitevault::config::{CONFIG, DEV_JWT_SECRET};
use sitevault::db::VaultStorage;
use sitevault::router::{AppState, vault_router};
use sitevault::storage::LocalImageStore;
use sitevault::token::TokenKeys;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        image_root = %cfg.image_root.display(),
        loglevel = %cfg.loglevel
    );
    if cfg.jwt_secret == DEV_JWT_SECRET {
        warn!("VAULT_JWT_SECRET not set; session tokens use the built-in development secret");
    }

    let storage = VaultStorage::connect(&cfg.database_url).await?;
    storage.init_schema().await?;
    let images = Arc::new(LocalImageStore::new(cfg.image_root.clone())?);
    let keys = TokenKeys::new(&cfg.jwt_secret);

    // Build axum router and serve
    let state = AppState::new(storage, images, keys);
    let app = vault_router(state, &cfg.image_root);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

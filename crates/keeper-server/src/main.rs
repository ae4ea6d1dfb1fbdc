//! String Keeper server binary.

use std::sync::Arc;

use anyhow::Context;
use keeper_git::{GitCli, KeeperBackend, SyncConfig};
use keeper_server::{AppState, KeeperConfig, create_router, metrics::init_metrics, run_server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = KeeperConfig::load().context("failed to load configuration")?;
    let addr = config
        .http
        .socket_addr()
        .with_context(|| format!("invalid listen address '{}'", config.http.address))?;

    tracing::info!(
        "Starting String Keeper v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Storage root: {}", config.storage.root.display());
    tracing::info!("Sync interval: {:?}", config.storage.sync_interval());

    let prometheus_handle = init_metrics().context("failed to initialize metrics")?;

    let store = GitCli::new()
        .with_binary(&config.storage.git_binary)
        .with_timeout(config.storage.git_timeout());
    let backend = KeeperBackend::new(
        &config.storage.root,
        Arc::new(store),
        SyncConfig {
            interval: config.storage.sync_interval(),
        },
    )
    .with_context(|| format!("failed to open storage root {}", config.storage.root.display()))?;
    let backend = Arc::new(backend);

    let state = AppState::new(Arc::clone(&backend), config.acl.clone());
    let app = create_router(state, &config.http.cors, prometheus_handle);

    run_server(addr, app).await?;

    backend.shutdown().await;
    tracing::info!("String Keeper stopped");

    Ok(())
}

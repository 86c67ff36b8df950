//! Voiswap API server
//!
//! Loads configuration from the environment, reads the pool and token
//! catalogs, and serves the quote API.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use algod_client::AlgodClient;
use voiswap_api::{start_server, AppState};
use voiswap_core::{AppConfig, PoolCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        algod = %config.algod_url,
        indexer = %config.indexer_url,
        port = config.port,
        "starting voiswap"
    );

    let catalog = PoolCatalog::load(
        Path::new(&config.pools_file),
        Path::new(&config.tokens_file),
    )
    .context("failed to load pool catalog")?;
    tracing::info!(
        pools = catalog.pools.len(),
        tokens = catalog.tokens.len(),
        "catalog loaded"
    );

    let gateway = AlgodClient::new(config.algod_url.as_str(), config.indexer_url.as_str())
        .context("failed to build node client")?;

    if config.platform_fee_bps > 0 && config.platform_fee_address.is_none() {
        tracing::warn!("PLATFORM_FEE_BPS set without PLATFORM_FEE_ADDRESS; fee disabled");
    }

    let port = config.port;
    let state = AppState::new(config, catalog, Arc::new(gateway));

    start_server(state, port).await.context("server exited")?;
    Ok(())
}

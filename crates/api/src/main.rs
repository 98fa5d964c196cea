//! people-bridge - resilient people lookup RPC service

use std::sync::Arc;

use anyhow::Context;
use peoplebridge_api::utils::logging::init_tracing;
use peoplebridge_api::{serve, AppContext};
use peoplebridge_infra::config;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialize logging")?;

    // Loading ran before any subscriber existed, so report the source now
    match config::config_source(|key| std::env::var(key).ok()) {
        Some(path) => tracing::info!(path = %path.display(), "Configuration loaded from file"),
        None => tracing::info!("Configuration loaded from defaults and environment"),
    }

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(err) => tracing::debug!(error = %err, "No .env file loaded"),
    }

    let bind_address = config.server.bind_address.clone();
    let context = Arc::new(AppContext::new(config).context("failed to wire application")?);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    serve(listener, context).await.context("server error")?;
    Ok(())
}

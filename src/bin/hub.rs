//! Tiltwatch Hub
//!
//! Run with: cargo run --bin tiltwatch-hub
//!
//! # Configuration
//!
//! Read from the default config locations, then environment variables:
//! - `TILTWATCH_HUB_HOST`: Host to bind to (default: 0.0.0.0)
//! - `TILTWATCH_HUB_PORT`: Port to listen on (default: 8000)
//! - `RUST_LOG`: Log filter (default: tiltwatch=info,tower_http=debug)

use tiltwatch::config::Config;
use tiltwatch::hub::{serve, HubConfig, HubState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Config::load_default()?;
    tiltwatch::logging::init(&loaded.config.logging, "tower_http=debug");

    tracing::info!("Starting Tiltwatch hub v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_summary();
    let config = loaded.config;

    let hub_config = HubConfig::from(&config.hub);
    tracing::info!(
        "Buffers: {} samples kept, {} served, {} log lines",
        hub_config.history_limit,
        hub_config.serve_limit,
        hub_config.log_limit
    );

    let state = HubState::new(hub_config.clone());
    serve(state, &hub_config).await?;

    tracing::info!("Tiltwatch hub stopped");
    Ok(())
}

//! Tiltwatch Dashboard
//!
//! Polls the hub's `/telemetry` endpoint and redraws the dashboard in the
//! terminal on every successful tick.
//!
//! Configuration is read from the default locations (see `tiltwatch-cli
//! config`), with `TILTWATCH_*` environment overrides.

use std::sync::Arc;
use tiltwatch::config::Config;
use tiltwatch::poller::{HttpTelemetrySource, Poller};
use tiltwatch::render::{Dashboard, TerminalSurface};
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Config::load_default()?;
    tiltwatch::logging::init(&loaded.config.logging, "");

    tracing::info!("Tiltwatch dashboard v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_summary();
    let config = loaded.config;

    let clock = config.label_clock()?;
    tracing::info!(
        "Labels: format {:?}, zone {}",
        clock.format(),
        clock.zone()
    );

    let source = HttpTelemetrySource::new(&config.poller.url, config.poller.request_timeout())?;
    tracing::info!("Telemetry endpoint: {}", source.url());

    let surface = TerminalSurface::stdout();
    let dashboard = Arc::new(RwLock::new(Dashboard::new(clock, Box::new(surface))));

    let poller = Poller::new(Arc::new(source), dashboard, config.poller.interval());
    let handle = poller.spawn()?;

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    handle.shutdown().await;
    tracing::info!("Poll stats: {}", poller.stats());

    Ok(())
}

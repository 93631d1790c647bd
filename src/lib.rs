//! # Tiltwatch
//!
//! Live dashboard and telemetry hub for a posture-monitoring sensor.
//!
//! The device uploads readings (tilt angle, light level, calibration button,
//! buzzer) to the hub. The dashboard polls the hub once per second and
//! renders two time-series charts plus a log panel, with calibration and
//! buzzer events drawn as overlay markers.
//!
//! ## Modules
//!
//! - [`telemetry`]: Wire types shared by hub and dashboard
//! - [`render`]: Payload to chart/log panel mapping and drawing surfaces
//! - [`poller`]: Fixed-cadence fetch loop with an explicit cancel handle
//! - [`hub`]: In-memory telemetry server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tiltwatch::poller::{HttpTelemetrySource, Poller};
//! use tiltwatch::render::{Dashboard, LabelClock, TerminalSurface};
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpTelemetrySource::new("http://localhost:8000", Duration::from_secs(5))?;
//!     let dashboard = Dashboard::new(LabelClock::default(), Box::new(TerminalSurface::stdout()));
//!
//!     let poller = Poller::new(
//!         Arc::new(source),
//!         Arc::new(RwLock::new(dashboard)),
//!         Duration::from_secs(1),
//!     );
//!
//!     let handle = poller.spawn()?;
//!     tokio::signal::ctrl_c().await?;
//!     handle.shutdown().await;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod hub;
pub mod logging;
pub mod poller;
pub mod render;
pub mod telemetry;

// Re-export top-level types for convenience
pub use telemetry::{Payload, Reading, Sample};

pub use render::{
    render, ChartId, ChartSeries, ChartState, Dashboard, DashboardSurface, DashboardView,
    LabelClock, LabelZone, LogPanel, RenderError, RenderOutcome, TerminalSurface,
};

pub use poller::{
    FetchError, HttpTelemetrySource, PollHandle, PollStats, Poller, ScheduleError, TelemetrySource,
    TickOutcome,
};

pub use hub::{build_router, serve, HubError, HubState};

pub use config::{Config, ConfigError, ConfigSource, LoadedConfig, LoggingConfig};

//! Telemetry Poller
//!
//! Fetches the telemetry payload on a fixed cadence and hands it to the
//! dashboard renderer.
//!
//! ## Architecture
//!
//! - **source**: `TelemetrySource` trait and the HTTP implementation
//! - **scheduler**: `Poller` (one cycle via `tick`) and `PollHandle`
//!   (the running schedule, with cancel)
//! - **error**: `FetchError`
//!
//! ## Failure policy
//!
//! A failed fetch is logged and otherwise ignored. There is no retry other
//! than the next scheduled tick, no backoff and no circuit breaking.

mod error;
mod scheduler;
mod source;

pub use error::{FetchError, FetchResult, ScheduleError};
pub use scheduler::{PollHandle, PollStats, Poller, TickOutcome, DEFAULT_POLL_INTERVAL};
pub use source::{telemetry_url, HttpTelemetrySource, TelemetrySource, TELEMETRY_PATH};

//! Telemetry Wire Types
//!
//! Types exchanged between the sensor device, the hub and the dashboard:
//!
//! - **Sample**: one reading as served by `GET /telemetry`
//! - **Payload**: the whole `GET /telemetry` body for one tick
//! - **Reading**: one device upload to `POST /ingest`

pub mod types;

pub use types::{Payload, Reading, Sample};

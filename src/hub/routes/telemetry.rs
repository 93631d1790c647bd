//! Telemetry Route
//!
//! - GET /telemetry - Current payload for the dashboard

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::hub::state::HubState;
use crate::telemetry::Payload;

/// GET /telemetry
///
/// Newest samples, kept log lines and the last calibration time.
pub async fn get_telemetry(State(state): State<Arc<HubState>>) -> Json<Payload> {
    Json(state.snapshot().await)
}

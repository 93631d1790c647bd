//! Ingest Route
//!
//! - POST /ingest - One device reading

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::hub::dto::IngestResponse;
use crate::hub::state::HubState;
use crate::telemetry::Reading;

/// POST /ingest
///
/// Record one reading, stamped with the hub's clock. Any well-formed
/// reading is accepted; malformed JSON is rejected by the extractor.
pub async fn ingest_reading(
    State(state): State<Arc<HubState>>,
    Json(reading): Json<Reading>,
) -> Json<IngestResponse> {
    let sample = state.record(reading).await;

    tracing::debug!(
        tilt_angle = sample.tilt_or_zero(),
        light = sample.light_or_zero(),
        calibration = sample.calibration,
        buzzer = sample.buzzer,
        "Reading ingested"
    );

    Json(IngestResponse {
        status: "ok".to_string(),
    })
}

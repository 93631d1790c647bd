//! Data Transfer Objects
//!
//! Response types for hub endpoints. Request and payload bodies are the
//! shared telemetry types.

use serde::{Deserialize, Serialize};

/// Ingest acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Status: "ok"
    pub status: String,
}

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Samples currently held
    pub samples: usize,
    /// Log lines currently held
    pub logs: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

//! Hub State
//!
//! Bounded in-memory buffers shared by all hub handlers.
//! Nothing is persisted; a restart starts from empty buffers.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::telemetry::{Payload, Reading, Sample};

/// Posture label used when a reading carries none
pub const UNKNOWN_POSTURE: &str = "Unknown";

/// Hub server configuration
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Samples kept in memory
    pub history_limit: usize,
    /// Samples returned by `/telemetry`
    pub serve_limit: usize,
    /// Log lines kept (and served)
    pub log_limit: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            history_limit: 1000,
            serve_limit: 300,
            log_limit: 50,
        }
    }
}

impl HubConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Default)]
struct Buffers {
    samples: VecDeque<Sample>,
    logs: VecDeque<String>,
    last_calibration: Option<f64>,
}

/// Shared state for all hub handlers
pub struct HubState {
    buffers: RwLock<Buffers>,
    pub config: Arc<HubConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl HubState {
    pub fn new(config: HubConfig) -> Self {
        Self {
            buffers: RwLock::new(Buffers::default()),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Record a device reading stamped with the current local time
    pub async fn record(&self, reading: Reading) -> Sample {
        self.record_at(reading, Local::now()).await
    }

    /// Record a device reading stamped with `now`
    ///
    /// Appends the sample and its log lines, then trims both buffers.
    pub async fn record_at(&self, reading: Reading, now: DateTime<Local>) -> Sample {
        let timestamp = now.timestamp_micros() as f64 / 1_000_000.0;
        let ctime = now.format("%a %b %e %H:%M:%S %Y").to_string();

        let sample = Sample {
            timestamp: Some(timestamp),
            tilt_angle: Some(reading.tilt_angle.unwrap_or(0.0)),
            light: Some(reading.light.unwrap_or(0.0)),
            calibration: reading.calibration as u8,
            buzzer: reading.buzzer as u8,
            posture_label: Some(
                reading
                    .posture_label
                    .unwrap_or_else(|| UNKNOWN_POSTURE.to_string()),
            ),
        };

        let mut buffers = self.buffers.write().await;
        buffers.samples.push_back(sample.clone());
        trim_front(&mut buffers.samples, self.config.history_limit);

        if sample.is_calibration() {
            buffers.last_calibration = Some(timestamp);
            buffers
                .logs
                .push_back(format!("[CALIBRATION] Button pressed at {}", ctime));
        }

        if sample.is_buzzer() {
            buffers.logs.push_back(format!(
                "[BUZZER] Triggered at {} (light={})",
                ctime,
                sample.light_or_zero()
            ));
        }

        buffers.logs.push_back(format!(
            "[POSTURE] {} (angle={:.1}°)",
            sample.posture_label.as_deref().unwrap_or(UNKNOWN_POSTURE),
            sample.tilt_or_zero()
        ));
        trim_front(&mut buffers.logs, self.config.log_limit);

        sample
    }

    /// The `/telemetry` payload: newest samples, all kept logs
    pub async fn snapshot(&self) -> Payload {
        let buffers = self.buffers.read().await;
        let skip = buffers.samples.len().saturating_sub(self.config.serve_limit);

        Payload {
            data: Some(buffers.samples.iter().skip(skip).cloned().collect()),
            logs: buffers.logs.iter().cloned().collect(),
            last_calibration: buffers.last_calibration,
        }
    }

    /// Number of samples held
    pub async fn sample_count(&self) -> usize {
        self.buffers.read().await.samples.len()
    }

    /// Number of log lines held
    pub async fn log_count(&self) -> usize {
        self.buffers.read().await.logs.len()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn trim_front<T>(buffer: &mut VecDeque<T>, limit: usize) {
    while buffer.len() > limit {
        buffer.pop_front();
    }
}

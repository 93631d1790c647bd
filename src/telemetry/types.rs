//! Core data types for sensor telemetry
//!
//! This module defines the wire types shared by the hub and the dashboard:
//! - `Sample`: one telemetry reading as served by `/telemetry`
//! - `Payload`: the full `/telemetry` response body for one tick
//! - `Reading`: one device upload to `/ingest`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single telemetry reading
///
/// Numeric fields are optional on the wire; charts treat a missing value as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Seconds since the Unix epoch (fractional)
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Tilt angle in degrees relative to the calibrated baseline
    #[serde(default)]
    pub tilt_angle: Option<f64>,
    /// Raw light sensor level
    #[serde(default)]
    pub light: Option<f64>,
    /// 1 when the calibration button was pressed for this reading
    #[serde(default, deserialize_with = "flag")]
    pub calibration: u8,
    /// 1 when the buzzer fired for this reading
    #[serde(default, deserialize_with = "flag")]
    pub buzzer: u8,
    /// Posture classification reported by the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture_label: Option<String>,
}

impl Sample {
    /// Create a sample at the given timestamp with no readings
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }

    /// Builder method: set tilt angle
    pub fn tilt_angle(mut self, angle: f64) -> Self {
        self.tilt_angle = Some(angle);
        self
    }

    /// Builder method: set light level
    pub fn light(mut self, light: f64) -> Self {
        self.light = Some(light);
        self
    }

    /// Builder method: mark as a calibration event
    pub fn calibrated(mut self) -> Self {
        self.calibration = 1;
        self
    }

    /// Builder method: mark as a buzzer event
    pub fn buzzed(mut self) -> Self {
        self.buzzer = 1;
        self
    }

    /// Builder method: set the posture label
    pub fn posture(mut self, label: impl Into<String>) -> Self {
        self.posture_label = Some(label.into());
        self
    }

    /// Tilt angle, 0 when missing
    pub fn tilt_or_zero(&self) -> f64 {
        self.tilt_angle.unwrap_or(0.0)
    }

    /// Light level, 0 when missing
    pub fn light_or_zero(&self) -> f64 {
        self.light.unwrap_or(0.0)
    }

    pub fn is_calibration(&self) -> bool {
        self.calibration == 1
    }

    pub fn is_buzzer(&self) -> bool {
        self.buzzer == 1
    }
}

/// Full body of a `/telemetry` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Payload {
    /// Chronological samples; absent is treated like empty
    #[serde(default)]
    pub data: Option<Vec<Sample>>,
    /// Log lines in display order
    #[serde(default)]
    pub logs: Vec<String>,
    /// Timestamp of the most recent calibration, if any
    #[serde(default)]
    pub last_calibration: Option<f64>,
}

impl Payload {
    /// Create a payload from samples and log lines
    pub fn new(data: Vec<Sample>, logs: Vec<String>) -> Self {
        Self {
            data: Some(data),
            logs,
            last_calibration: None,
        }
    }

    /// Builder method: set last calibration timestamp
    pub fn last_calibration(mut self, timestamp: f64) -> Self {
        self.last_calibration = Some(timestamp);
        self
    }

    /// Samples, empty when `data` was absent
    pub fn samples(&self) -> &[Sample] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }
}

/// One device upload to the hub's `/ingest` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    #[serde(default)]
    pub tilt_angle: Option<f64>,
    #[serde(default)]
    pub posture_label: Option<String>,
    #[serde(default)]
    pub light: Option<f64>,
    /// Any truthy JSON value counts as a buzzer event
    #[serde(default, deserialize_with = "truthy")]
    pub buzzer: bool,
    /// Any truthy JSON value counts as a calibration press
    #[serde(default, deserialize_with = "truthy")]
    pub calibration: bool,
}

/// Accept any JSON value; only the number 1 sets the flag.
fn flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_f64() {
        Some(n) if n == 1.0 => 1,
        _ => 0,
    })
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

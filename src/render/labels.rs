//! Time-of-day labels for the chart x-axis

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};
use std::str::FromStr;

use super::error::{RenderError, RenderResult};

/// Label shown for a timestamp that cannot be placed on the clock
pub const INVALID_LABEL: &str = "Invalid Date";

/// Default label format: 24h wall-clock time
pub const DEFAULT_LABEL_FORMAT: &str = "%H:%M:%S";

/// Time zone used to render labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelZone {
    /// The machine's local zone
    Local,
    Utc,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl FromStr for LabelZone {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(LabelZone::Local),
            "utc" | "z" => Ok(LabelZone::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(LabelZone::Fixed)
                .map_err(|_| RenderError::InvalidZone(s.to_string())),
        }
    }
}

impl std::fmt::Display for LabelZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelZone::Local => write!(f, "local"),
            LabelZone::Utc => write!(f, "utc"),
            LabelZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Converts sample timestamps (seconds) into display labels
#[derive(Debug, Clone)]
pub struct LabelClock {
    format: String,
    zone: LabelZone,
}

impl LabelClock {
    /// Create a clock, rejecting format strings chrono cannot render
    pub fn new(format: impl Into<String>, zone: LabelZone) -> RenderResult<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::InvalidFormat(format));
        }
        Ok(Self { format, zone })
    }

    /// Wall-clock labels in UTC, mostly useful for deterministic output
    pub fn utc() -> Self {
        Self {
            format: DEFAULT_LABEL_FORMAT.to_string(),
            zone: LabelZone::Utc,
        }
    }

    pub fn zone(&self) -> LabelZone {
        self.zone
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Label for a timestamp in seconds since the epoch
    ///
    /// The timestamp is scaled to whole milliseconds (truncating) before it
    /// is placed on the clock. Missing, non-finite or out of range timestamps
    /// yield [`INVALID_LABEL`].
    pub fn label(&self, timestamp: Option<f64>) -> String {
        let Some(seconds) = timestamp else {
            return INVALID_LABEL.to_string();
        };

        let millis = (seconds * 1000.0).trunc();
        if !millis.is_finite() {
            return INVALID_LABEL.to_string();
        }

        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(millis as i64) else {
            return INVALID_LABEL.to_string();
        };

        match self.zone {
            LabelZone::Local => utc.with_timezone(&Local).format(&self.format).to_string(),
            LabelZone::Utc => utc.format(&self.format).to_string(),
            LabelZone::Fixed(offset) => utc.with_timezone(&offset).format(&self.format).to_string(),
        }
    }
}

impl Default for LabelClock {
    fn default() -> Self {
        Self {
            format: DEFAULT_LABEL_FORMAT.to_string(),
            zone: LabelZone::Local,
        }
    }
}

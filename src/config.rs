//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::hub;
use crate::render::{LabelClock, LabelZone};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telemetry poller configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Base URL of the hub serving `/telemetry`
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_interval() -> u64 {
    1000 // 1 second
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            interval_ms: default_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Dashboard display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// strftime format for x-axis labels
    #[serde(default = "default_label_format")]
    pub label_format: String,

    /// "local", "utc" or a fixed offset such as "+02:00"
    #[serde(default = "default_label_timezone")]
    pub label_timezone: String,
}

fn default_label_format() -> String {
    crate::render::DEFAULT_LABEL_FORMAT.to_string()
}

fn default_label_timezone() -> String {
    "local".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            label_format: default_label_format(),
            label_timezone: default_label_timezone(),
        }
    }
}

/// Telemetry hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_serve_limit")]
    pub serve_limit: usize,

    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_history_limit() -> usize {
    1000
}

fn default_serve_limit() -> usize {
    300
}

fn default_log_limit() -> usize {
    50
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            history_limit: default_history_limit(),
            serve_limit: default_serve_limit(),
            log_limit: default_log_limit(),
        }
    }
}

impl From<&HubConfig> for hub::HubConfig {
    fn from(config: &HubConfig) -> Self {
        hub::HubConfig {
            host: config.host.clone(),
            port: config.port,
            history_limit: config.history_limit,
            serve_limit: config.serve_limit,
            log_limit: config.log_limit,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_lookup(path, env_lookup)
    }

    fn load_with_lookup(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here; call [`LoadedConfig::log_summary`] once the
    /// subscriber is installed.
    pub fn load_default() -> Result<LoadedConfig, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("tiltwatch").join("config.toml")),
            Some(PathBuf::from("/etc/tiltwatch/config.toml")),
            Some(PathBuf::from("./tiltwatch.toml")),
        ];
        let paths: Vec<PathBuf> = config_paths.into_iter().flatten().collect();

        Self::load_first(&paths, env_lookup)
    }

    /// First candidate file that loads wins; files that exist but fail are
    /// recorded and skipped. With no usable file, environment only.
    fn load_first(
        paths: &[PathBuf],
        lookup: impl Fn(&str) -> Option<String> + Copy,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut rejected = Vec::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_lookup(path, lookup) {
                Ok(config) => {
                    return Ok(LoadedConfig {
                        config,
                        source: ConfigSource::File(path.clone()),
                        rejected,
                    });
                }
                Err(e) => rejected.push((path.clone(), e)),
            }
        }

        Ok(LoadedConfig {
            config: Self::from_lookup(lookup)?,
            source: ConfigSource::Environment,
            rejected,
        })
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poller.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poller.interval_ms",
                error: "must be greater than zero".to_string(),
            });
        }

        self.label_clock()?;
        Ok(())
    }

    /// Label clock described by the dashboard section
    pub fn label_clock(&self) -> Result<LabelClock, ConfigError> {
        let zone: LabelZone =
            self.dashboard
                .label_timezone
                .parse()
                .map_err(|e: crate::render::RenderError| ConfigError::Invalid {
                    field: "dashboard.label_timezone",
                    error: e.to_string(),
                })?;

        LabelClock::new(self.dashboard.label_format.clone(), zone).map_err(|e| {
            ConfigError::Invalid {
                field: "dashboard.label_format",
                error: e.to_string(),
            }
        })
    }

    /// Apply `TILTWATCH_*` overrides to an existing config
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Poller overrides
        if let Some(url) = lookup("TILTWATCH_URL") {
            self.poller.url = url;
        }
        if let Some(interval) = lookup("TILTWATCH_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.poller.interval_ms = ms;
            }
        }

        // Hub overrides
        if let Some(host) = lookup("TILTWATCH_HUB_HOST") {
            self.hub.host = host;
        }
        if let Some(port) = lookup("TILTWATCH_HUB_PORT") {
            if let Ok(p) = port.parse() {
                self.hub.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("TILTWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TILTWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Defaults plus environment overrides
    Environment,
}

/// Result of [`Config::load_default`]
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
    /// Candidate files that exist but could not be used
    pub rejected: Vec<(PathBuf, ConfigError)>,
}

impl LoadedConfig {
    /// Report the load through tracing
    pub fn log_summary(&self) {
        for (path, error) in &self.rejected {
            tracing::warn!("Failed to load config from {:?}: {}", path, error);
        }
        match &self.source {
            ConfigSource::File(path) => tracing::info!("Loaded config from {:?}", path),
            ConfigSource::Environment => {
                tracing::info!("Using default config with environment overrides")
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Tiltwatch Configuration
#
# Environment variables override these settings:
# - TILTWATCH_URL
# - TILTWATCH_POLL_INTERVAL_MS
# - TILTWATCH_HUB_HOST
# - TILTWATCH_HUB_PORT
# - TILTWATCH_LOG_LEVEL
# - TILTWATCH_LOG_FORMAT

[poller]
# Base URL of the hub serving /telemetry
url = "http://localhost:8000"

# Time between ticks (ms)
interval_ms = 1000

# Per-request timeout (ms)
request_timeout_ms = 5000

[dashboard]
# strftime format for chart x-axis labels
label_format = "%H:%M:%S"

# Time zone for labels: local, utc, or an offset such as +02:00
label_timezone = "local"

[hub]
# Hub server host
host = "0.0.0.0"

# Hub server port
port = 8000

# Samples kept in memory
history_limit = 1000

# Samples returned by /telemetry
serve_limit = 300

# Log lines kept
log_limit = 50

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

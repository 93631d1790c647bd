//! Renderer error types

use thiserror::Error;

/// Errors raised while setting up the renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// Label format string contains a specifier chrono cannot render
    #[error("Invalid label format: {0}")]
    InvalidFormat(String),

    /// Label time zone is not "local", "utc" or a +HH:MM offset
    #[error("Invalid label time zone: {0}")]
    InvalidZone(String),
}

/// Result type alias for renderer setup
pub type RenderResult<T> = Result<T, RenderError>;

//! Poller error types

use thiserror::Error;

/// A tick's fetch or parse failed
///
/// Every variant is handled the same way at the poll boundary: logged, and
/// the dashboard keeps its previous state until a later tick succeeds.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection refused or host unreachable
    #[error("Telemetry endpoint unavailable: {0}")]
    Unavailable(String),

    /// No response within the request timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body is not a telemetry payload
    #[error("Malformed payload (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Sort a reqwest error into the matching variant
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// The poll schedule could not be started
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Poll interval must be greater than zero")]
    ZeroInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Unavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Telemetry endpoint unavailable: connection refused"
        );

        let source = serde_json::from_str::<crate::telemetry::Payload>("<html>").unwrap_err();
        let err = FetchError::Decode {
            status: 502,
            source,
        };
        assert!(err.to_string().starts_with("Malformed payload (HTTP 502)"));
    }
}

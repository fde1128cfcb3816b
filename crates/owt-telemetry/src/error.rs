//! Telemetry error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during telemetry setup
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    /// Invalid configuration (e.g. unparsable log level)
    #[error("Invalid telemetry configuration: {0}")]
    InvalidConfiguration(String),

    /// A log directory could not be created
    #[error("Cannot create log directory {path}: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tracing subscriber error (usually: a global subscriber is already set)
    #[error("Tracing subscriber error: {0}")]
    TracingError(String),
}

impl TelemetryError {
    /// Sanitize error message for display outside the process
    pub fn sanitize(&self) -> String {
        match self {
            Self::InvalidConfiguration(_) => "Invalid logging configuration".to_string(),
            Self::LogDirectory { .. } => "Log directory unavailable".to_string(),
            Self::TracingError(_) => "Logging could not be initialized".to_string(),
        }
    }
}

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

//! Error types for owt-server
//!
//! Wraps the engine and telemetry errors and maps every failure onto the
//! service's HTTP contract: an absent token is `400`, a refused caller is an
//! empty `401`, and every other fault is a generic `406`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use owt_auth::OwtError;
use owt_telemetry::TelemetryError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Result type for server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Main error type for owt-server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ServerError {
    /// Token engine or origin gate error
    #[error(transparent)]
    Owt(#[from] OwtError),

    /// Logging could not be set up
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// Configuration sources could not be read or deserialized
    #[error("Config loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// A configuration value is missing or invalid
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },

    /// Request body was not a usable claim request
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// I/O errors (binding the listener, serving)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServerError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error with key context
    pub fn configuration_with_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Owt(OwtError::TokenAbsent) => StatusCode::BAD_REQUEST,
            Self::Owt(OwtError::OriginRejected { .. }) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::NOT_ACCEPTABLE,
        }
    }

    /// Sanitize error message for client responses
    ///
    /// The full error goes to the exception log; clients only see this.
    pub fn sanitize(&self) -> String {
        match self {
            Self::Owt(e) => e.sanitize(),
            Self::Telemetry(e) => e.sanitize(),
            Self::InvalidBody(_) => "Request body is not a valid claim request".to_string(),
            Self::ConfigLoad(_) | Self::Configuration { .. } => "Service misconfigured".to_string(),
            Self::Io(_) | Self::Serialization(_) => "Service error".to_string(),
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigLoad(_) | Self::Configuration { .. } => 2,
            Self::Owt(OwtError::KeyMaterial { .. } | OwtError::Configuration { .. }) => 2,
            _ => 1,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        match status {
            StatusCode::BAD_REQUEST => {
                (status, Json(OwtError::TokenAbsent.sanitize())).into_response()
            }
            StatusCode::UNAUTHORIZED => status.into_response(),
            _ => {
                match &self {
                    Self::InvalidBody(_) => warn!(error = %self, "Rejected request body"),
                    _ => error!(error = %self, "Request failed"),
                }
                let body = json!({
                    "error": "not_acceptable",
                    "error_description": self.sanitize(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::from(OwtError::TokenAbsent).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(OwtError::origin_rejected("x")).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::from(OwtError::signing("bad key")).status(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            ServerError::InvalidBody("eof".into()).status(),
            StatusCode::NOT_ACCEPTABLE
        );
    }

    #[test]
    fn test_sanitize_hides_internals() {
        let err = ServerError::from(OwtError::signing("HMAC key length 0"));
        assert!(!err.sanitize().contains("HMAC"));

        let err = ServerError::configuration_with_key("must be > 0", "token.ttl_minutes");
        assert_eq!(err.sanitize(), "Service misconfigured");
        assert_eq!(err.exit_code(), 2);
    }
}

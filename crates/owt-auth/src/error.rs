//! Error types for owt-auth
//!
//! Expected security failures (missing, tampered, expired or foreign tokens,
//! disallowed origins, degraded lookups) are modelled here so callers can turn
//! them into ordinary negative results. Only key-material and configuration
//! problems are genuine faults.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for owt-auth operations
pub type OwtResult<T> = std::result::Result<T, OwtError>;

/// Main error type for owt-auth
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OwtError {
    /// Token could not be produced
    ///
    /// Covers claim assembly (blank issuer/audience), window arithmetic and
    /// the signing step itself. No partial token is ever returned.
    #[error("Signing failure: {reason}")]
    SigningFailure { reason: String },

    /// No bearer token was supplied with the request
    #[error("No bearer token supplied")]
    TokenAbsent,

    /// A token was supplied but failed verification
    #[error("Token rejected: {reason}")]
    TokenInvalid { reason: String },

    /// The origin gate denied the caller
    #[error("Origin rejected for client '{client_id}'")]
    OriginRejected { client_id: String },

    /// Reverse DNS lookup failed or timed out
    #[error("Reverse lookup degraded: {reason}")]
    LookupDegraded { reason: String },

    /// Key material could not be read or was empty
    #[error("Key material error: {message}")]
    KeyMaterial {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid engine or gate configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },
}

impl OwtError {
    /// Create a signing failure
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::SigningFailure {
            reason: reason.into(),
        }
    }

    /// Create a token rejection
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::TokenInvalid {
            reason: reason.into(),
        }
    }

    /// Create an origin rejection for the given client identifier
    pub fn origin_rejected(client_id: impl Into<String>) -> Self {
        Self::OriginRejected {
            client_id: client_id.into(),
        }
    }

    /// Create a degraded-lookup error
    pub fn lookup_degraded(reason: impl Into<String>) -> Self {
        Self::LookupDegraded {
            reason: reason.into(),
        }
    }

    /// Create a key material error
    pub fn key_material(message: impl Into<String>) -> Self {
        Self::KeyMaterial {
            message: message.into(),
            path: None,
        }
    }

    /// Create a key material error with the offending path
    pub fn key_material_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::KeyMaterial {
            message: message.into(),
            path: Some(path.into()),
        }
    }

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

    /// Whether this error is an expected security outcome rather than a fault
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::TokenAbsent
                | Self::TokenInvalid { .. }
                | Self::OriginRejected { .. }
                | Self::LookupDegraded { .. }
        )
    }

    /// Sanitize error message for client responses
    ///
    /// Removes internal details to prevent information disclosure. The full
    /// error belongs in the exception log only.
    pub fn sanitize(&self) -> String {
        match self {
            Self::SigningFailure { .. } => "Token could not be generated".to_string(),
            Self::TokenAbsent => "Token does not exist.".to_string(),
            Self::TokenInvalid { .. } => "Token is not valid".to_string(),
            Self::OriginRejected { .. } => "Access denied".to_string(),
            Self::LookupDegraded { .. }
            | Self::KeyMaterial { .. }
            | Self::Configuration { .. } => "Service error".to_string(),
        }
    }
}

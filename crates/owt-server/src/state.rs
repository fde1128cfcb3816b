//! Shared handler state

use std::sync::Arc;

use owt_auth::{AuditLogger, OriginGate, SigningKey, TokenIssuer, TokenValidator};

use crate::config::ServiceConfig;
use crate::error::ServerResult;

/// Engine handles cloned into every request
///
/// Both halves share one key and are immutable after startup, so handlers
/// run concurrently without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl AppState {
    /// Create state from prebuilt engine halves
    pub fn new(issuer: TokenIssuer, validator: TokenValidator) -> Self {
        Self {
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
        }
    }

    /// Load the key and build both engine halves
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be read or is empty.
    pub fn from_config(config: &ServiceConfig) -> ServerResult<Self> {
        let key = Arc::new(SigningKey::load(&config.token.key_path)?);
        let audit = AuditLogger::new(config.origin.app_id.clone());

        let issuer = TokenIssuer::new(Arc::clone(&key))
            .with_ttl(config.token_ttl())
            .with_audit(audit.clone());
        let validator = TokenValidator::new(
            key,
            config.token.issuers.clone(),
            config.token.audiences.clone(),
        )
        .with_leeway(config.clock_skew())
        .with_audit(audit);

        Ok(Self::new(issuer, validator))
    }
}

/// Build the origin gate described by `[origin]`
pub fn origin_gate(config: &ServiceConfig) -> OriginGate {
    OriginGate::new(config.origin_policy())
        .with_lookup_timeout(config.lookup_timeout())
        .with_audit(AuditLogger::new(config.origin.app_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owt_auth::DelimitedList;
    use std::io::Write;

    #[test]
    fn test_from_config_loads_key() {
        let mut key = tempfile::NamedTempFile::new().unwrap();
        writeln!(key, "-----BEGIN OWT KEY-----\nc2VjcmV0LWtleS1tYXRlcmlhbA==\n-----END OWT KEY-----").unwrap();

        let mut config = ServiceConfig::default();
        config.token.key_path = key.path().to_path_buf();
        config.token.issuers = DelimitedList::parse("svcA");
        config.token.audiences = DelimitedList::parse("appB");
        config.token.ttl_minutes = 5;

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.issuer.ttl(), std::time::Duration::from_secs(300));
    }

    #[test]
    fn test_from_config_missing_key() {
        let mut config = ServiceConfig::default();
        config.token.key_path = "/nonexistent/owt.pem".into();

        let err = AppState::from_config(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

//! Token issuance

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, Header, encode};

use crate::audit::{AuditLogger, OwtEvent};
use crate::claims::{ClaimSet, ClaimSetRequest};
use crate::error::{OwtError, OwtResult};
use crate::key::SigningKey;

/// Default token lifetime (60 minutes)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Produces signed OWTs from caller claim requests
///
/// The validity window is always computed from the server clock; nothing in
/// a [`ClaimSetRequest`] can influence it.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    ttl: Duration,
    audit: AuditLogger,
}

impl TokenIssuer {
    /// Create an issuer with the default TTL
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self {
            key,
            ttl: DEFAULT_TOKEN_TTL,
            audit: AuditLogger::default(),
        }
    }

    /// Set the token lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the audit logger
    #[must_use]
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// Configured token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid from now for the configured TTL
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::SigningFailure`] if the claims cannot be assembled
    /// or signed.
    pub fn issue(&self, request: &ClaimSetRequest) -> OwtResult<String> {
        self.issue_at(request, Utc::now().trunc_subsecs(0))
    }

    /// Issue a token whose window starts at `issued_at`
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::SigningFailure`] if the claims cannot be assembled
    /// or signed.
    pub fn issue_at(
        &self,
        request: &ClaimSetRequest,
        issued_at: DateTime<Utc>,
    ) -> OwtResult<String> {
        let result = self.sign(request, issued_at);

        match &result {
            Ok(token) => self.audit.log(OwtEvent::TokenIssued {
                summary: request.to_string(),
                created: !token.is_empty(),
            }),
            Err(e) => self.audit.log(OwtEvent::IssueFailed {
                summary: request.to_string(),
                reason: e.to_string(),
            }),
        }

        result
    }

    fn sign(&self, request: &ClaimSetRequest, issued_at: DateTime<Utc>) -> OwtResult<String> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| OwtError::signing(format!("token lifetime out of range: {e}")))?;
        let claims = ClaimSet::assemble(request, issued_at, ttl)?;

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.key.encoding_key())
            .map_err(|e| OwtError::signing(format!("JWT signing failed: {e}")))?;

        if token.is_empty() {
            return Err(OwtError::signing("signer produced an empty token"));
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        let key = SigningKey::from_material("issuer-test-secret").unwrap();
        TokenIssuer::new(Arc::new(key))
    }

    #[test]
    fn test_issue_produces_compact_jwt() {
        let token = issuer()
            .issue(&ClaimSetRequest::new("svcA", "appB"))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_header_is_hs256() {
        let token = issuer()
            .issue(&ClaimSetRequest::new("svcA", "appB"))
            .unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_blank_issuer_is_signing_failure() {
        let err = issuer()
            .issue(&ClaimSetRequest::new("", "appB"))
            .unwrap_err();
        assert!(matches!(err, OwtError::SigningFailure { .. }));
    }

    #[test]
    fn test_zero_ttl_is_signing_failure() {
        let err = issuer()
            .with_ttl(Duration::ZERO)
            .issue(&ClaimSetRequest::new("svcA", "appB"))
            .unwrap_err();
        assert!(matches!(err, OwtError::SigningFailure { .. }));
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(issuer().ttl(), Duration::from_secs(3600));
        assert_eq!(
            issuer().with_ttl(Duration::from_secs(60)).ttl(),
            Duration::from_secs(60)
        );
    }
}

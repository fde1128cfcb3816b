//! Token verification
//!
//! The validator never surfaces raw verification errors. Every bearer header
//! resolves to one of three [`Verification`] outcomes: no token present, a
//! token that failed verification (with a reason for the log), or a verified
//! claim set.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, Validation, decode};

use crate::audit::{AuditLogger, OwtEvent};
use crate::claims::ClaimSet;
use crate::error::{OwtError, OwtResult};
use crate::key::SigningKey;
use crate::list::DelimitedList;

use super::bearer::bearer_token;

/// Result of verifying a bearer header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// No bearer token was supplied
    Absent,
    /// A token was supplied but rejected
    Invalid(String),
    /// The token verified; its claims are attached
    Valid(ClaimSet),
}

impl Verification {
    /// Whether verification succeeded
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Whether no token was supplied
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Verified claims, if any
    #[must_use]
    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            Self::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    /// Consume into verified claims, if any
    #[must_use]
    pub fn into_claims(self) -> Option<ClaimSet> {
        match self {
            Self::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    /// Convert into the engine error taxonomy
    ///
    /// # Errors
    ///
    /// [`OwtError::TokenAbsent`] or [`OwtError::TokenInvalid`] for the two
    /// negative outcomes.
    pub fn into_result(self) -> OwtResult<ClaimSet> {
        match self {
            Self::Valid(claims) => Ok(claims),
            Self::Absent => Err(OwtError::TokenAbsent),
            Self::Invalid(reason) => Err(OwtError::invalid_token(reason)),
        }
    }

    /// Log label for this outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Invalid(_) => "invalid",
            Self::Valid(_) => "valid",
        }
    }

    fn reason(&self) -> Option<String> {
        match self {
            Self::Invalid(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Verifies OWTs against the shared key and the allowed issuer/audience lists
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: Arc<SigningKey>,
    issuers: DelimitedList,
    audiences: DelimitedList,
    leeway: Duration,
    audit: AuditLogger,
}

impl TokenValidator {
    /// Create a validator with zero clock-skew leeway
    pub fn new(key: Arc<SigningKey>, issuers: DelimitedList, audiences: DelimitedList) -> Self {
        Self {
            key,
            issuers,
            audiences,
            leeway: Duration::ZERO,
            audit: AuditLogger::default(),
        }
    }

    /// Allow this much clock skew on `exp` and `nbf`
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set the audit logger
    #[must_use]
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// Answer the "validate" operation for an `Authorization` header value
    pub fn validate(&self, authorization: Option<&str>) -> bool {
        self.check(authorization, "validate").is_valid()
    }

    /// Answer the "get payload" operation for an `Authorization` header value
    pub fn extract(&self, authorization: Option<&str>) -> Verification {
        self.check(authorization, "extract")
    }

    /// Verify a raw token string
    pub fn verify(&self, token: &str) -> Verification {
        match decode::<ClaimSet>(token, &self.key.decoding_key(), &self.validation()) {
            Ok(data) => Verification::Valid(data.claims),
            Err(e) => Verification::Invalid(e.to_string()),
        }
    }

    fn check(&self, authorization: Option<&str>, operation: &str) -> Verification {
        let verification = match bearer_token(authorization) {
            Some(token) => self.verify(token),
            None => Verification::Absent,
        };

        self.audit.log(OwtEvent::TokenVerified {
            operation: operation.to_string(),
            outcome: verification.outcome().to_string(),
            token_present: !verification.is_absent(),
            reason: verification.reason(),
        });

        verification
    }

    fn validation(&self) -> Validation {
        let issuers: Vec<&str> = self.issuers.iter().collect();
        let audiences: Vec<&str> = self.audiences.iter().collect();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&issuers);
        validation.set_audience(&audiences);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.leeway.as_secs();
        validation
    }
}

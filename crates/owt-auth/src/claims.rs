//! Claim-set types carried by an OWT
//!
//! [`ClaimSetRequest`] is what a caller may ask for: issuer, audience and the
//! ten application claims. It has no timestamp fields, so a caller cannot
//! express a validity window. [`ClaimSet`] is the signed payload; its window
//! is always computed by the server at issuance.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OwtError, OwtResult};

/// Caller-supplied issuance request
///
/// Accepts both the camelCase field names used on the wire and the
/// PascalCase names older callers still send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimSetRequest {
    /// Intended `iss` claim
    #[serde(alias = "Issuer")]
    pub issuer: String,
    /// Intended `aud` claim
    #[serde(alias = "Audience")]
    pub audience: String,
    #[serde(alias = "URI", alias = "uri")]
    pub subject_uri: String,
    #[serde(alias = "Actor")]
    pub actor: String,
    #[serde(alias = "Role")]
    pub role: String,
    #[serde(alias = "SID", alias = "sid")]
    pub session_id: String,
    #[serde(alias = "Name", alias = "name")]
    pub display_name: String,
    #[serde(alias = "EmployeeId", alias = "employeeId")]
    pub subject_id: String,
    #[serde(alias = "DNS")]
    pub dns: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "MacAddress")]
    pub mac_address: String,
    #[serde(alias = "IpAddress")]
    pub ip_address: String,
}

impl ClaimSetRequest {
    /// Create a request for the given issuer and audience
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            ..Self::default()
        }
    }

    /// Set the role claim
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the actor claim
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Set the subject identifier claim
    #[must_use]
    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    /// Set the email claim
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

impl fmt::Display for ClaimSetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ISSUER: {} | AUDIENCE: {} | ROLE: {} | ACTOR: {}",
            self.issuer, self.audience, self.role, self.actor
        )
    }
}

/// The signed payload of an OWT
///
/// Registered claims use their JWT names; application claims are camelCase
/// and always present (empty string when the caller omitted them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSet {
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "aud")]
    pub audience: String,
    #[serde(rename = "nbf", with = "chrono::serde::ts_seconds")]
    pub not_before: DateTime<Utc>,
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
    pub subject_uri: String,
    pub actor: String,
    pub role: String,
    pub session_id: String,
    pub display_name: String,
    pub subject_id: String,
    pub dns: String,
    pub email: String,
    pub mac_address: String,
    pub ip_address: String,
}

impl ClaimSet {
    /// Assemble a claim set for `request` valid from `issued_at` for `ttl`
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::SigningFailure`] if the issuer or audience is blank,
    /// or if the window end cannot be represented.
    pub fn assemble(
        request: &ClaimSetRequest,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> OwtResult<Self> {
        if request.issuer.trim().is_empty() {
            return Err(OwtError::signing("issuer must not be blank"));
        }
        if request.audience.trim().is_empty() {
            return Err(OwtError::signing("audience must not be blank"));
        }
        if ttl <= Duration::zero() {
            return Err(OwtError::signing("token lifetime must be positive"));
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| OwtError::signing("token expiry overflows the calendar"))?;

        Ok(Self {
            issuer: request.issuer.clone(),
            audience: request.audience.clone(),
            not_before: issued_at,
            issued_at,
            expires_at,
            subject_uri: request.subject_uri.clone(),
            actor: request.actor.clone(),
            role: request.role.clone(),
            session_id: request.session_id.clone(),
            display_name: request.display_name.clone(),
            subject_id: request.subject_id.clone(),
            dns: request.dns.clone(),
            email: request.email.clone(),
            mac_address: request.mac_address.clone(),
            ip_address: request.ip_address.clone(),
        })
    }

    /// Whether `instant` falls inside `[not_before, expires_at]`
    #[must_use]
    pub fn is_live_at(&self, instant: DateTime<Utc>) -> bool {
        self.not_before <= instant && instant <= self.expires_at
    }

    /// The application claims, in their wire order
    #[must_use]
    pub fn application_claims(&self) -> [(&'static str, &str); 10] {
        [
            ("subjectUri", &self.subject_uri),
            ("actor", &self.actor),
            ("role", &self.role),
            ("sessionId", &self.session_id),
            ("displayName", &self.display_name),
            ("subjectId", &self.subject_id),
            ("dns", &self.dns),
            ("email", &self.email),
            ("macAddress", &self.mac_address),
            ("ipAddress", &self.ip_address),
        ]
    }
}

//! Structured audit logging for token and origin events
//!
//! Every decision point in the engine emits one [`OwtEvent`] through an
//! [`AuditLogger`]. Events are plain `tracing` records with the target
//! `owt::audit`, so the subscriber decides where they land (console, service
//! log, exception log).
//!
//! ```rust
//! use owt_auth::audit::{AuditLogger, OwtEvent};
//!
//! let logger = AuditLogger::new("owt-service");
//! logger.log(OwtEvent::IssueFailed {
//!     summary: "ISSUER:  | AUDIENCE: appB".to_string(),
//!     reason: "issuer must not be blank".to_string(),
//! });
//! ```
//!
//! No event carries key material or a full token.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Audit target used for every event
pub const AUDIT_TARGET: &str = "owt::audit";

/// Audit logger for engine events
#[derive(Debug, Clone)]
pub struct AuditLogger {
    service_name: String,
}

impl AuditLogger {
    /// Create a new audit logger with the given service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Service name attached to each record
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Log an engine event
    pub fn log(&self, event: OwtEvent) {
        let audit_id = Uuid::now_v7();

        match &event {
            OwtEvent::TokenIssued { summary, created } => {
                let token_state = if *created { "CREATED" } else { "NULL|EMPTY" };
                info!(
                    target: AUDIT_TARGET,
                    audit_id = %audit_id,
                    event_type = "token_issued",
                    json_web_token = token_state,
                    summary = %summary,
                    service = %self.service_name,
                    "Token issued"
                );
            }
            OwtEvent::IssueFailed { summary, reason } => {
                warn!(
                    target: AUDIT_TARGET,
                    audit_id = %audit_id,
                    event_type = "issue_failed",
                    json_web_token = "NULL|EMPTY",
                    summary = %summary,
                    reason = %reason,
                    service = %self.service_name,
                    "Token issuance failed"
                );
            }
            OwtEvent::TokenVerified {
                operation,
                outcome,
                token_present,
                reason,
            } => {
                let token_state = if *token_present { "EXIST" } else { "NOT EXIST" };
                info!(
                    target: AUDIT_TARGET,
                    audit_id = %audit_id,
                    event_type = "token_verified",
                    operation = %operation,
                    outcome = %outcome,
                    json_web_token = token_state,
                    reason = ?reason,
                    service = %self.service_name,
                    "Token verification completed"
                );
            }
            OwtEvent::OriginDecision {
                accepted,
                client_id,
                user_agent,
                host_address,
                host_name,
                reason,
            } => {
                if *accepted {
                    info!(
                        target: AUDIT_TARGET,
                        audit_id = %audit_id,
                        event_type = "origin_decision",
                        decision = "ACCEPTED_REQUEST",
                        client_id = %client_id,
                        user_agent = %user_agent,
                        host_address = %host_address,
                        host_name = %host_name,
                        service = %self.service_name,
                        "Origin accepted"
                    );
                } else {
                    info!(
                        target: AUDIT_TARGET,
                        audit_id = %audit_id,
                        event_type = "origin_decision",
                        decision = "REJECTED_REQUEST",
                        client_id = %client_id,
                        user_agent = %user_agent,
                        host_address = %host_address,
                        host_name = %host_name,
                        reason = ?reason,
                        service = %self.service_name,
                        "Origin rejected"
                    );
                }
            }
            OwtEvent::LookupDegraded {
                host_address,
                reason,
            } => {
                warn!(
                    target: AUDIT_TARGET,
                    audit_id = %audit_id,
                    event_type = "lookup_degraded",
                    host_address = %host_address,
                    reason = %reason,
                    service = %self.service_name,
                    "Reverse lookup degraded"
                );
            }
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new("owt")
    }
}

/// Engine events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OwtEvent {
    /// Issuer produced a token
    TokenIssued {
        /// One-line request summary (issuer, audience, role, actor)
        summary: String,
        /// Whether a non-empty token string came out
        created: bool,
    },

    /// Issuer failed; no token was returned
    IssueFailed { summary: String, reason: String },

    /// Validator finished a verification
    TokenVerified {
        /// `validate` or `extract`
        operation: String,
        /// `valid`, `invalid` or `absent`
        outcome: String,
        token_present: bool,
        reason: Option<String>,
    },

    /// Gate reached a decision
    OriginDecision {
        accepted: bool,
        client_id: String,
        user_agent: String,
        host_address: String,
        host_name: String,
        reason: Option<String>,
    },

    /// Reverse DNS failed or timed out; host name treated as empty
    LookupDegraded { host_address: String, reason: String },
}

impl OwtEvent {
    /// Short event type name, as written to the `event_type` field
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TokenIssued { .. } => "token_issued",
            Self::IssueFailed { .. } => "issue_failed",
            Self::TokenVerified { .. } => "token_verified",
            Self::OriginDecision { .. } => "origin_decision",
            Self::LookupDegraded { .. } => "lookup_degraded",
        }
    }
}

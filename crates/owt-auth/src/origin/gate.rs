//! The origin authorization gate

use std::sync::Arc;
use std::time::Duration;

use crate::audit::{AuditLogger, OwtEvent};

use super::policy::{AuthorizationDecision, OriginPolicy, Principal};
use super::resolver::{ReverseResolver, SystemResolver};
use super::signals::OriginSignals;

/// Default upper bound on one reverse lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Admission control run before every protected operation
///
/// Resolves the caller's host name (bounded by a timeout), applies the
/// [`OriginPolicy`] and logs the decision. A failed or slow lookup only
/// degrades the host name to empty; it never fails the request on its own.
#[derive(Debug, Clone)]
pub struct OriginGate {
    policy: Arc<OriginPolicy>,
    resolver: Arc<dyn ReverseResolver>,
    lookup_timeout: Duration,
    audit: AuditLogger,
}

impl OriginGate {
    /// Create a gate using the system resolver
    pub fn new(policy: OriginPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            resolver: Arc::new(SystemResolver),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            audit: AuditLogger::default(),
        }
    }

    /// Replace the reverse resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn ReverseResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the reverse lookup timeout
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the audit logger
    #[must_use]
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// The policy in force
    pub fn policy(&self) -> &OriginPolicy {
        &self.policy
    }

    /// Principal attached to admitted requests
    pub fn principal(&self) -> Principal {
        Principal::allowed_caller(self.policy.app_id.clone())
    }

    /// Decide whether the caller may proceed
    pub async fn authorize(&self, signals: &OriginSignals) -> AuthorizationDecision {
        let host_name = self.resolve_host_name(signals).await;
        let decision = self.policy.decide(signals, &host_name);

        self.audit.log(OwtEvent::OriginDecision {
            accepted: decision.accepted,
            client_id: decision.client_id.clone(),
            user_agent: decision.user_agent.clone(),
            host_address: decision.host_address.clone(),
            host_name: decision.host_name.clone(),
            reason: decision.reason.clone(),
        });

        decision
    }

    async fn resolve_host_name(&self, signals: &OriginSignals) -> String {
        let Some(addr) = signals.peer_ip() else {
            self.degraded(signals, "no usable host address".to_string());
            return String::new();
        };

        match tokio::time::timeout(self.lookup_timeout, self.resolver.reverse_lookup(addr)).await {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                self.degraded(signals, e.to_string());
                String::new()
            }
            Err(_) => {
                self.degraded(
                    signals,
                    format!("timed out after {}ms", self.lookup_timeout.as_millis()),
                );
                String::new()
            }
        }
    }

    fn degraded(&self, signals: &OriginSignals, reason: String) {
        self.audit.log(OwtEvent::LookupDegraded {
            host_address: signals.host_address.clone(),
            reason,
        });
    }
}

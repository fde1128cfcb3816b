//! Origin admission policy
//!
//! Default deny. A caller is admitted only when its client identifier is
//! non-empty and allow-listed, and none of the identifier, agent string, host
//! address or resolved host name is block-listed. The block-list always wins.

use serde::Serialize;

use crate::error::{OwtError, OwtResult};
use crate::list::DelimitedList;

use super::identifier::derive_client_label;
use super::signals::OriginSignals;

/// Role attached to every admitted caller
pub const ALLOWED_CALLER_ROLE: &str = "InAllowableCallList";

/// Allow/block lists plus the placeholder agent and service identity
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    /// Identifiers admitted by the gate
    pub allow: DelimitedList,
    /// Identifiers, agents, addresses or host names always refused
    pub block: DelimitedList,
    /// Agent string treated as "no agent" (e.g. a framework default)
    pub default_agent: String,
    /// Identity attached to the principal of admitted callers
    pub app_id: String,
}

impl OriginPolicy {
    /// Create a policy from allow and block lists
    pub fn new(allow: DelimitedList, block: DelimitedList) -> Self {
        Self {
            allow,
            block,
            ..Self::default()
        }
    }

    /// Set the placeholder agent string
    #[must_use]
    pub fn with_default_agent(mut self, default_agent: impl Into<String>) -> Self {
        self.default_agent = default_agent.into();
        self
    }

    /// Set the identity given to admitted callers
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Derive the client identifier for a caller
    ///
    /// The agent string wins when it is non-empty and not the placeholder;
    /// otherwise the label derived from the resolved host name is used.
    pub fn client_identifier(&self, user_agent: &str, host_name: &str) -> String {
        if !user_agent.is_empty() && user_agent != self.default_agent {
            return user_agent.to_string();
        }
        derive_client_label(host_name)
    }

    /// Decide on a caller given its signals and resolved host name
    pub fn decide(&self, signals: &OriginSignals, host_name: &str) -> AuthorizationDecision {
        let client_id = self.client_identifier(&signals.user_agent, host_name);

        let reason = if client_id.is_empty() {
            Some("client identifier is empty".to_string())
        } else if let Some(hit) = self.block_hit(&client_id, signals, host_name) {
            Some(format!("{hit} is block-listed"))
        } else if !self.allow.contains(&client_id) {
            Some("client identifier is not allow-listed".to_string())
        } else {
            None
        };

        AuthorizationDecision {
            accepted: reason.is_none(),
            client_id,
            user_agent: signals.user_agent.clone(),
            host_address: signals.host_address.clone(),
            host_name: host_name.to_string(),
            reason,
        }
    }

    fn block_hit(
        &self,
        client_id: &str,
        signals: &OriginSignals,
        host_name: &str,
    ) -> Option<&'static str> {
        [
            ("client identifier", client_id),
            ("user agent", signals.user_agent.as_str()),
            ("host address", signals.host_address.as_str()),
            ("host name", host_name),
        ]
        .into_iter()
        .find(|(_, value)| self.block.contains(value))
        .map(|(signal, _)| signal)
    }
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub accepted: bool,
    /// Identifier the decision was reached on
    pub client_id: String,
    pub user_agent: String,
    pub host_address: String,
    /// Reverse-DNS name, empty when the lookup degraded
    pub host_name: String,
    /// Why the caller was refused
    pub reason: Option<String>,
}

impl AuthorizationDecision {
    /// Convert into the engine error taxonomy
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::OriginRejected`] when the caller was refused.
    pub fn ensure_accepted(&self) -> OwtResult<()> {
        if self.accepted {
            Ok(())
        } else {
            Err(OwtError::origin_rejected(self.client_id.clone()))
        }
    }
}

/// Identity attached to an admitted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub identity: String,
    pub roles: Vec<String>,
}

impl Principal {
    /// Principal carrying the allowed-caller role
    pub fn allowed_caller(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            roles: vec![ALLOWED_CALLER_ROLE.to_string()],
        }
    }

    /// Whether the principal carries `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(allow: &str, block: &str) -> OriginPolicy {
        OriginPolicy::new(DelimitedList::parse(allow), DelimitedList::parse(block))
            .with_app_id("owt-service")
    }

    #[test]
    fn test_agent_wins_over_host_label() {
        let p = policy("", "");
        assert_eq!(p.client_identifier("client-one", "a.b.c.d"), "client-one");
        assert_eq!(p.client_identifier("", "a.b.c.d"), "b.c.d");
    }

    #[test]
    fn test_placeholder_agent_falls_back_to_label() {
        let p = policy("", "").with_default_agent("Mozilla/5.0");
        assert_eq!(p.client_identifier("Mozilla/5.0", "a.b.c.d"), "b.c.d");
    }

    #[test]
    fn test_allow_listed_agent_accepted() {
        let p = policy("client-one", "");
        let decision = p.decide(&OriginSignals::new("client-one", "10.0.0.1"), "");
        assert!(decision.accepted);
        assert!(decision.ensure_accepted().is_ok());
        assert_eq!(decision.reason, None);
    }

    #[test]
    fn test_block_list_wins() {
        let p = policy("client-one", "client-one");
        let decision = p.decide(&OriginSignals::new("client-one", "10.0.0.1"), "");
        assert!(!decision.accepted);
        assert!(matches!(
            decision.ensure_accepted(),
            Err(OwtError::OriginRejected { .. })
        ));
    }

    #[test]
    fn test_block_list_checks_every_signal() {
        let signals = OriginSignals::new("client-one", "10.0.0.1");

        let by_address = policy("client-one", "10.0.0.1").decide(&signals, "x.y.z.w");
        assert!(!by_address.accepted);
        assert_eq!(by_address.reason.as_deref(), Some("host address is block-listed"));

        let by_host = policy("client-one", "x.y.z.w").decide(&signals, "x.y.z.w");
        assert!(!by_host.accepted);
        assert_eq!(by_host.reason.as_deref(), Some("host name is block-listed"));
    }

    #[test]
    fn test_default_deny() {
        let p = policy("client-one", "");
        assert!(!p.decide(&OriginSignals::new("other", "10.0.0.1"), "").accepted);
        assert!(!p.decide(&OriginSignals::new("", "10.0.0.1"), "").accepted);
        assert!(!policy("", "").decide(&OriginSignals::new("", ""), "").accepted);
    }

    #[test]
    fn test_host_label_accepted() {
        let p = policy("corp.example.com", "");
        let decision = p.decide(&OriginSignals::new("", "10.0.0.1"), "web01.corp.example.com");
        assert!(decision.accepted);
        assert_eq!(decision.client_id, "corp.example.com");
    }

    #[test]
    fn test_principal_role() {
        let principal = Principal::allowed_caller("owt-service");
        assert!(principal.has_role(ALLOWED_CALLER_ROLE));
        assert!(!principal.has_role("Admin"));
        assert_eq!(principal.identity, "owt-service");
    }
}

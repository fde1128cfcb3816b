//! Caller-identifying signals read from an inbound request

use std::net::IpAddr;

use http::HeaderMap;
use http::header::USER_AGENT;

/// Proxy header carrying the original client chain
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
/// Alternative proxy header carrying the client address
pub const X_REAL_IP: &str = "x-real-ip";

/// What the gate knows about a caller before reverse DNS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginSignals {
    /// `User-Agent` header value, empty when missing
    pub user_agent: String,
    /// Caller address in textual form, empty when unknown
    pub host_address: String,
}

impl OriginSignals {
    /// Create signals from explicit values
    pub fn new(user_agent: impl Into<String>, host_address: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            host_address: host_address.into(),
        }
    }

    /// Read signals from request headers and the socket peer address
    ///
    /// Proxy headers (`X-Forwarded-For`, then `X-Real-IP`) are consulted only
    /// when `trust_forwarded_for` is set; otherwise any client could spoof its
    /// address.
    pub fn from_headers(headers: &HeaderMap, peer: Option<IpAddr>, trust_forwarded_for: bool) -> Self {
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let forwarded = trust_forwarded_for
            .then(|| forwarded_address(headers))
            .flatten();

        let host_address = forwarded
            .or_else(|| peer.map(|ip| ip.to_string()))
            .unwrap_or_default();

        Self {
            user_agent,
            host_address,
        }
    }

    /// The host address as an IP, if it parses
    pub fn peer_ip(&self) -> Option<IpAddr> {
        self.host_address.parse().ok()
    }
}

fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get(X_REAL_IP)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

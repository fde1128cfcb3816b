//! Reverse DNS capability
//!
//! The gate never calls the system resolver directly; it goes through a
//! [`ReverseResolver`] so tests can inject fixed answers or slow lookups.

use std::collections::HashMap;
use std::fmt::Debug;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::{OwtError, OwtResult};

/// Maps a peer address to a host name
#[async_trait]
pub trait ReverseResolver: Send + Sync + Debug {
    /// Resolve `addr` to a host name
    ///
    /// # Errors
    ///
    /// Returns [`OwtError::LookupDegraded`] when no name is available.
    async fn reverse_lookup(&self, addr: IpAddr) -> OwtResult<String>;
}

/// Resolver backed by the operating system (`getnameinfo`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl ReverseResolver for SystemResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> OwtResult<String> {
        let name = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr))
            .await
            .map_err(|e| OwtError::lookup_degraded(format!("lookup task failed: {e}")))?
            .map_err(|e| OwtError::lookup_degraded(format!("reverse lookup failed: {e}")))?;

        // getnameinfo falls back to the numeric form when no PTR record exists
        if name.parse::<IpAddr>().is_ok() {
            return Err(OwtError::lookup_degraded(format!(
                "no host name for {addr}"
            )));
        }
        Ok(name)
    }
}

/// Resolver answering from a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashMap<IpAddr, String>,
}

impl StaticResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a PTR entry
    #[must_use]
    pub fn with_entry(mut self, addr: IpAddr, host_name: impl Into<String>) -> Self {
        self.names.insert(addr, host_name.into());
        self
    }
}

#[async_trait]
impl ReverseResolver for StaticResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> OwtResult<String> {
        self.names
            .get(&addr)
            .cloned()
            .ok_or_else(|| OwtError::lookup_degraded(format!("no host name for {addr}")))
    }
}

//! # Tower Middleware Integration for the Origin Gate
//!
//! - [`OriginGateLayer`] - a Tower Layer that wraps services with the gate
//! - [`OriginGateService`] - the Tower Service that runs the gate per request
//! - [`SignalExtractor`] - how caller signals are read from a request
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use owt_auth::origin::OriginGate;
//! use owt_auth::tower::OriginGateLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(OriginGateLayer::new(gate))
//!     .service(my_http_handler);
//! ```
//!
//! ## Request Extensions
//!
//! On acceptance the [`Principal`](crate::origin::Principal) and the
//! [`AuthorizationDecision`](crate::origin::AuthorizationDecision) are
//! inserted into the request's extensions. Rejected requests never reach the
//! inner service; they receive `401 Unauthorized` with an empty body.

mod layer;
mod service;

use std::net::SocketAddr;

use crate::origin::OriginSignals;

pub use layer::OriginGateLayer;
pub use service::OriginGateService;

/// Reads caller signals from an HTTP request
pub trait SignalExtractor: Send + Sync + 'static {
    /// Extract the agent string and host address
    fn extract<B>(&self, req: &http::Request<B>) -> OriginSignals;
}

/// Extractor using request headers and a `SocketAddr` request extension
///
/// Proxy headers are honoured only when `trust_forwarded_for` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSignalExtractor {
    pub trust_forwarded_for: bool,
}

impl HeaderSignalExtractor {
    /// Create an extractor
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            trust_forwarded_for,
        }
    }
}

impl SignalExtractor for HeaderSignalExtractor {
    fn extract<B>(&self, req: &http::Request<B>) -> OriginSignals {
        let peer = req
            .extensions()
            .get::<SocketAddr>()
            .map(SocketAddr::ip);
        OriginSignals::from_headers(req.headers(), peer, self.trust_forwarded_for)
    }
}

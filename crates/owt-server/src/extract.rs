//! Request extractors tying axum to the origin gate

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use owt_auth::tower::SignalExtractor;
use owt_auth::{ALLOWED_CALLER_ROLE, OriginSignals, OwtError, Principal};

use crate::error::ServerError;

/// Handler argument proving the origin gate admitted the caller
///
/// Fails with an empty `401` when the request carries no principal with the
/// allowed-caller role, e.g. a route mounted outside the gate by mistake.
#[derive(Debug, Clone)]
pub struct AllowedCaller(pub Principal);

impl<S> FromRequestParts<S> for AllowedCaller
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(principal) if principal.has_role(ALLOWED_CALLER_ROLE) => {
                Ok(Self(principal.clone()))
            }
            _ => Err(OwtError::origin_rejected("").into()),
        }
    }
}

/// Signal extractor for axum's `ConnectInfo<SocketAddr>`
///
/// Falls back to a bare `SocketAddr` extension so tests and other front ends
/// can supply the peer directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectInfoExtractor {
    pub trust_forwarded_for: bool,
}

impl ConnectInfoExtractor {
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            trust_forwarded_for,
        }
    }
}

impl SignalExtractor for ConnectInfoExtractor {
    fn extract<B>(&self, req: &http::Request<B>) -> OriginSignals {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .or_else(|| req.extensions().get::<SocketAddr>().map(SocketAddr::ip));
        OriginSignals::from_headers(req.headers(), peer, self.trust_forwarded_for)
    }
}

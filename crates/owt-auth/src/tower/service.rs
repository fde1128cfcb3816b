//! Tower Service implementation for the origin gate

use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::StatusCode;
use tower_service::Service;

use crate::origin::OriginGate;

use super::SignalExtractor;

/// Tower Service that runs the origin gate before the inner service
///
/// # Type Parameters
///
/// * `S` - The inner service type
/// * `K` - The signal extraction strategy
#[derive(Debug)]
pub struct OriginGateService<S, K> {
    inner: S,
    gate: Arc<OriginGate>,
    extractor: Arc<K>,
}

impl<S, K> OriginGateService<S, K> {
    /// Create a new gate service
    pub fn new(inner: S, gate: Arc<OriginGate>, extractor: Arc<K>) -> Self {
        Self {
            inner,
            gate,
            extractor,
        }
    }

    /// Get a reference to the inner service
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Clone, K> Clone for OriginGateService<S, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: Arc::clone(&self.gate),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<S, K, B, ResBody> Service<http::Request<B>> for OriginGateService<S, K>
where
    S: Service<http::Request<B>, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    K: SignalExtractor,
    B: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = http::Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        let signals = self.extractor.extract(&req);
        let gate = Arc::clone(&self.gate);

        // The clone may not be ready; keep the one poll_ready was called on
        let inner = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, inner);

        Box::pin(async move {
            let decision = gate.authorize(&signals).await;
            if !decision.accepted {
                let mut response = http::Response::new(ResBody::default());
                *response.status_mut() = StatusCode::UNAUTHORIZED;
                return Ok(response);
            }

            req.extensions_mut().insert(gate.principal());
            req.extensions_mut().insert(decision);
            inner.call(req).await
        })
    }
}

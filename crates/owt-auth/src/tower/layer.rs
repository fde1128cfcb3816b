//! Tower Layer implementation for the origin gate

use std::sync::Arc;

use tower::Layer;

use crate::origin::OriginGate;

use super::service::OriginGateService;
use super::{HeaderSignalExtractor, SignalExtractor};

/// Tower Layer that puts the origin gate in front of a service
///
/// # Type Parameters
///
/// * `K` - The signal extraction strategy (defaults to [`HeaderSignalExtractor`])
#[derive(Debug, Clone)]
pub struct OriginGateLayer<K = HeaderSignalExtractor> {
    gate: Arc<OriginGate>,
    extractor: Arc<K>,
}

impl OriginGateLayer<HeaderSignalExtractor> {
    /// Create a layer that reads the peer address and ignores proxy headers
    pub fn new(gate: OriginGate) -> Self {
        Self::from_arc(Arc::new(gate), HeaderSignalExtractor::default())
    }
}

impl<K: SignalExtractor> OriginGateLayer<K> {
    /// Create a layer with a custom signal extractor
    pub fn with_extractor(gate: OriginGate, extractor: K) -> Self {
        Self::from_arc(Arc::new(gate), extractor)
    }

    /// Create a layer from a shared gate
    pub fn from_arc(gate: Arc<OriginGate>, extractor: K) -> Self {
        Self {
            gate,
            extractor: Arc::new(extractor),
        }
    }
}

impl<S, K: SignalExtractor> Layer<S> for OriginGateLayer<K> {
    type Service = OriginGateService<S, K>;

    fn layer(&self, inner: S) -> Self::Service {
        OriginGateService::new(inner, Arc::clone(&self.gate), Arc::clone(&self.extractor))
    }
}

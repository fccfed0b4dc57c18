//! Applies a filter chain to a frame.

use framefx_core::Frame;
use framefx_gpu::Backend;
use tracing::trace;

use crate::{FilterChain, FilterId, FilterParams, FilterRegistry, OpsResult};

/// Runs the active chain, in order, over one frame.
///
/// The engine never mutates the chain and holds no per-frame state.
#[derive(Debug, Default)]
pub struct FilterEngine {
    registry: FilterRegistry,
}

impl FilterEngine {
    /// Engine with a registry dispatching on `backend`.
    pub fn new(backend: Backend) -> Self {
        Self::with_registry(FilterRegistry::new(backend))
    }

    /// Engine around an existing registry.
    pub fn with_registry(registry: FilterRegistry) -> Self {
        Self { registry }
    }

    /// Filter registry.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Applies every filter in `chain` not listed in `exclusions`.
    ///
    /// Each filter receives the previous filter's output. An empty chain
    /// returns a copy of the input.
    ///
    /// # Errors
    ///
    /// - [`OpsError::EmptyFrame`](crate::OpsError::EmptyFrame) before any
    ///   filter runs, if the frame has no pixels
    /// - the first error raised by a filter, e.g.
    ///   [`OpsError::DeviceUnavailable`](crate::OpsError::DeviceUnavailable)
    ///   for blur/erode/dilate without a compute context
    pub fn apply(
        &self,
        chain: &FilterChain,
        frame: &Frame,
        params: &FilterParams,
        exclusions: &[FilterId],
    ) -> OpsResult<Frame> {
        trace!(
            chain = %chain,
            w = frame.width(),
            h = frame.height(),
            excluded = exclusions.len(),
            "FilterEngine::apply"
        );
        frame.ensure_non_empty()?;

        let mut current = frame.clone();
        for id in chain.iter().filter(|id| !exclusions.contains(id)) {
            current = self.registry.transform(id, &current, params)?;
        }
        Ok(current)
    }
}

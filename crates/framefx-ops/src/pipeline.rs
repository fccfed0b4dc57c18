//! Session state shared between the frame loop and the controls.
//!
//! A [`Pipeline`] owns the chain and the parameters behind locks. Controls
//! (toggle, move, parameter setters) lock briefly; each processing cycle
//! takes a snapshot of both and runs the engine outside the locks, so a
//! mutation never lands in the middle of a cycle.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use framefx_core::Frame;
use framefx_gpu::Backend;
use tracing::debug;

use crate::kernels::{self, Histogram};
use crate::{FilterChain, FilterEngine, FilterId, FilterParams, OpsResult};

/// Filters left out of the histogram preview.
pub const PREVIEW_EXCLUSIONS: &[FilterId] = &[FilterId::Binary];

/// Chain, parameters and engine for one processing session.
#[derive(Debug)]
pub struct Pipeline {
    chain: Mutex<FilterChain>,
    params: RwLock<FilterParams>,
    engine: FilterEngine,
}

impl Pipeline {
    /// Empty chain and default parameters.
    pub fn new(backend: Backend) -> Self {
        Self::with_chain(FilterChain::new(), FilterParams::default(), backend)
    }

    /// Pipeline starting from an existing chain and parameters.
    pub fn with_chain(chain: FilterChain, params: FilterParams, backend: Backend) -> Self {
        Self {
            chain: Mutex::new(chain),
            params: RwLock::new(params),
            engine: FilterEngine::new(backend),
        }
    }

    /// Toggles a filter by name; returns its new status.
    pub fn toggle(&self, name: &str) -> OpsResult<bool> {
        self.lock_chain().toggle_named(name)
    }

    /// Moves a filter one step towards the front.
    pub fn move_up(&self, name: &str) -> OpsResult<()> {
        self.lock_chain().move_up_named(name)
    }

    /// Moves a filter one step towards the back.
    pub fn move_down(&self, name: &str) -> OpsResult<()> {
        self.lock_chain().move_down_named(name)
    }

    /// Sets the binary threshold used from the next cycle on.
    pub fn set_threshold(&self, threshold: f32) -> OpsResult<()> {
        self.update_params(|p| p.with_threshold(threshold))
    }

    /// Sets the pixelize block size used from the next cycle on.
    pub fn set_block_size(&self, block_size: u32) -> OpsResult<()> {
        self.update_params(|p| p.with_block_size(block_size))
    }

    /// Copy of the current chain.
    pub fn chain(&self) -> FilterChain {
        self.lock_chain().clone()
    }

    /// Copy of the current parameters.
    pub fn params(&self) -> FilterParams {
        *self.params.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Engine used for every cycle.
    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Runs one cycle over `frame` with the full chain.
    pub fn process(&self, frame: &Frame) -> OpsResult<Frame> {
        let (chain, params) = self.snapshot();
        self.engine.apply(&chain, frame, &params, &[])
    }

    /// Runs the chain without `binary` and returns the result with its histogram.
    pub fn preview(&self, frame: &Frame) -> OpsResult<(Frame, Histogram)> {
        let (chain, params) = self.snapshot();
        let out = self.engine.apply(&chain, frame, &params, PREVIEW_EXCLUSIONS)?;
        let hist = kernels::histogram(&out);
        Ok((out, hist))
    }

    fn snapshot(&self) -> (FilterChain, FilterParams) {
        (self.chain(), self.params())
    }

    fn update_params(&self, f: impl FnOnce(FilterParams) -> FilterParams) -> OpsResult<()> {
        let mut guard = self.params.write().unwrap_or_else(PoisonError::into_inner);
        let next = f(*guard);
        next.validate()?;
        debug!(threshold = next.threshold, block_size = next.block_size, "Updated filter parameters");
        *guard = next;
        Ok(())
    }

    fn lock_chain(&self) -> MutexGuard<'_, FilterChain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Backend::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;
    use framefx_core::Channels;
    use std::sync::Arc;

    #[test]
    fn test_controls_and_process() {
        let pipeline = Pipeline::new(Backend::Cpu);
        assert!(pipeline.toggle("gray").unwrap());
        assert!(pipeline.toggle("negative").unwrap());
        pipeline.move_up("negative").unwrap();
        assert_eq!(pipeline.chain().to_string(), "negative,gray");

        let frame = Frame::filled(4, 4, &[255, 255, 255]).unwrap();
        let out = pipeline.process(&frame).unwrap();
        assert_eq!(out.channels(), Channels::Gray);
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_unknown_name_no_change() {
        let pipeline = Pipeline::new(Backend::Cpu);
        pipeline.toggle("sobel").unwrap();
        assert!(matches!(pipeline.toggle("nope"), Err(OpsError::InvalidFilterId(_))));
        assert_eq!(pipeline.chain().ids(), &[FilterId::Sobel]);
    }

    #[test]
    fn test_invalid_param_rejected() {
        let pipeline = Pipeline::new(Backend::Cpu);
        assert!(pipeline.set_block_size(0).is_err());
        assert_eq!(pipeline.params().block_size, 15);

        pipeline.set_threshold(42.0).unwrap();
        assert_eq!(pipeline.params().threshold, 42.0);
    }

    #[test]
    fn test_threshold_read_per_cycle() {
        let pipeline = Pipeline::new(Backend::Cpu);
        pipeline.toggle("binary").unwrap();
        let frame = Frame::filled(2, 2, &[100]).unwrap();

        assert!(pipeline.process(&frame).unwrap().data().iter().all(|&v| v == 0));
        pipeline.set_threshold(50.0).unwrap();
        assert!(pipeline.process(&frame).unwrap().data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_preview_excludes_binary() {
        let pipeline = Pipeline::new(Backend::Cpu);
        pipeline.toggle("gray").unwrap();
        pipeline.toggle("binary").unwrap();

        let frame = Frame::filled(5, 2, &[60, 60, 60]).unwrap();
        let (out, hist) = pipeline.preview(&frame).unwrap();
        assert_eq!(out.data(), &[60; 10]);
        assert_eq!(hist[60], 10);
        assert_eq!(hist.iter().sum::<u64>(), 10);
    }

    #[test]
    fn test_concurrent_toggles_keep_chain_consistent() {
        let pipeline = Arc::new(Pipeline::new(Backend::Cpu));
        let frame = Frame::filled(16, 16, &[30, 60, 90]).unwrap();

        let controls = {
            let p = pipeline.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    let id = FilterId::ALL[i % 8];
                    p.toggle(id.name()).unwrap();
                }
            })
        };
        for _ in 0..50 {
            pipeline.process(&frame).unwrap();
        }
        controls.join().unwrap();

        let chain = pipeline.chain();
        assert_eq!(chain.len(), chain.status().active_count());
    }
}

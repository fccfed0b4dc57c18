//! Frame-level dispatcher for the accelerated filters.
//!
//! The compute context is acquired lazily on first use and cached for the
//! lifetime of the dispatcher; it is released when the dispatcher is dropped
//! or [`ComputeDispatcher::release`] is called. Each dispatch allocates and
//! frees its own device buffers, so dispatches are independent of each other
//! and of the order in which they run.

use std::sync::{Arc, Mutex, PoisonError};

use framefx_core::Frame;
use tracing::{debug, trace};

use crate::backend::{Backend, MorphOp, ProcessingBackend, create_backend};
use crate::{GpuError, GpuResult};

/// Runs blur/erode/dilate over frames on the selected backend.
pub struct ComputeDispatcher {
    backend: Backend,
    active: Mutex<Option<Arc<dyn ProcessingBackend>>>,
}

impl ComputeDispatcher {
    /// Dispatcher for `backend`; no device is touched until the first dispatch.
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            active: Mutex::new(None),
        }
    }

    /// Requested backend.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Name of the acquired backend, if a context is currently held.
    pub fn active_backend_name(&self) -> Option<&'static str> {
        self.lock().as_ref().map(|b| b.name())
    }

    /// True once a context has been acquired and not released.
    pub fn is_acquired(&self) -> bool {
        self.lock().is_some()
    }

    /// Drops the cached context; the next dispatch acquires a new one.
    pub fn release(&self) {
        if self.lock().take().is_some() {
            debug!(backend = %self.backend, "Released compute context");
        }
    }

    /// Return the cached context, acquiring it on first use.
    ///
    /// A failed acquisition is not cached, so a later call retries.
    fn acquire(&self) -> GpuResult<Arc<dyn ProcessingBackend>> {
        let mut slot = self.lock();
        if let Some(b) = slot.as_ref() {
            return Ok(Arc::clone(b));
        }
        let b = create_backend(self.backend)?;
        debug!(requested = %self.backend, acquired = b.name(), "Acquired compute context");
        *slot = Some(Arc::clone(&b));
        Ok(b)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn ProcessingBackend>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `op` on `frame`.
    ///
    /// The frame is reduced to grayscale and normalized to `[0, 1]`; the
    /// result is rescaled to 8 bits and always has a single channel.
    pub fn dispatch(&self, op: MorphOp, frame: &Frame) -> GpuResult<Frame> {
        let (w, h) = frame.dimensions();
        trace!(?op, w, h, channels = frame.channel_count(), "ComputeDispatcher::dispatch");
        if frame.is_empty() {
            return Err(GpuError::InvalidDimensions(w, h));
        }

        let backend = self.acquire()?;
        let input = frame.to_normalized_gray();
        let output = backend.run(op, &input, w, h)?;

        Frame::from_normalized_gray(w, h, &output).map_err(|e| GpuError::OperationFailed(e.to_string()))
    }

    /// 5x5 box blur; border band of width 2 unchanged.
    pub fn blur(&self, frame: &Frame) -> GpuResult<Frame> {
        self.dispatch(MorphOp::Blur, frame)
    }

    /// 3x3 minimum; border band of width 1 unchanged.
    pub fn erode(&self, frame: &Frame) -> GpuResult<Frame> {
        self.dispatch(MorphOp::Erode, frame)
    }

    /// 3x3 maximum; border band of width 1 unchanged.
    pub fn dilate(&self, frame: &Frame) -> GpuResult<Frame> {
        self.dispatch(MorphOp::Dilate, frame)
    }
}

impl Default for ComputeDispatcher {
    fn default() -> Self {
        Self::new(Backend::Auto)
    }
}

impl std::fmt::Debug for ComputeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeDispatcher")
            .field("backend", &self.backend)
            .field("active", &self.active_backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefx_core::Channels;

    #[test]
    fn test_lazy_acquisition() {
        let d = ComputeDispatcher::new(Backend::Cpu);
        assert!(!d.is_acquired());

        let frame = Frame::filled(4, 4, &[10]).unwrap();
        d.blur(&frame).unwrap();
        assert!(d.is_acquired());
        assert_eq!(d.active_backend_name(), Some("cpu"));

        d.release();
        assert!(!d.is_acquired());
    }

    #[test]
    fn test_rgb_input_yields_gray() {
        let d = ComputeDispatcher::new(Backend::Cpu);
        let frame = Frame::filled(6, 5, &[255, 255, 255]).unwrap();
        let out = d.dilate(&frame).unwrap();
        assert_eq!(out.channels(), Channels::Gray);
        assert_eq!(out.dimensions(), (6, 5));
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_erode_exact_values() {
        // 8-bit values survive normalize/rescale exactly for min/max
        let frame = Frame::from_fn(5, 5, Channels::Gray, |x, y, _| (x * 40 + y * 7) as u8);
        let d = ComputeDispatcher::new(Backend::Cpu);
        let out = d.erode(&frame).unwrap();
        // interior (2,2): min over x 1..=3, y 1..=3 is at (1,1)
        assert_eq!(out.pixel(2, 2), &[47]);
        // border pixel unchanged
        assert_eq!(out.pixel(4, 0), frame.pixel(4, 0));
    }

    #[test]
    fn test_blur_rounds() {
        // 5x5, center interior sees 24 zeros and one 255: 255/25 = 10.2 -> 10
        let mut data = vec![0u8; 25];
        data[0] = 255;
        let frame = Frame::gray(5, 5, data).unwrap();
        let out = ComputeDispatcher::new(Backend::Cpu).blur(&frame).unwrap();
        assert_eq!(out.pixel(2, 2), &[10]);
        assert_eq!(out.pixel(0, 0), &[255]);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let d = ComputeDispatcher::new(Backend::Cpu);
        let frame = Frame::new(0, 0, Channels::Gray);
        assert_eq!(d.erode(&frame).unwrap_err(), GpuError::InvalidDimensions(0, 0));
        // rejected before any context is acquired
        assert!(!d.is_acquired());
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn test_wgpu_unavailable_not_cached() {
        let d = ComputeDispatcher::new(Backend::Wgpu);
        let frame = Frame::filled(4, 4, &[1]).unwrap();
        for _ in 0..2 {
            let err = d.blur(&frame).unwrap_err();
            assert!(err.is_device_unavailable());
            assert!(!d.is_acquired());
        }
    }
}

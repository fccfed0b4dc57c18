//! Maps filter ids to their transforms.

use framefx_core::Frame;
use framefx_gpu::{Backend, ComputeDispatcher};
use tracing::trace;

use crate::kernels;
use crate::{FilterId, FilterParams, OpsResult};

/// Resolves a [`FilterId`] to a kernel or a compute dispatch.
///
/// Every transform is a pure function of the input frame and the parameter
/// snapshot. The registry owns the compute dispatcher, so the device context
/// is shared by all GPU-backed filters and acquired on first use.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    dispatcher: ComputeDispatcher,
}

impl FilterRegistry {
    /// Registry dispatching blur/erode/dilate on `backend`.
    pub fn new(backend: Backend) -> Self {
        Self::with_dispatcher(ComputeDispatcher::new(backend))
    }

    /// Registry around an existing dispatcher.
    pub fn with_dispatcher(dispatcher: ComputeDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Compute dispatcher used by the GPU-backed filters.
    pub fn dispatcher(&self) -> &ComputeDispatcher {
        &self.dispatcher
    }

    /// Runs filter `id` on `frame`.
    pub fn transform(&self, id: FilterId, frame: &Frame, params: &FilterParams) -> OpsResult<Frame> {
        trace!(filter = %id, w = frame.width(), h = frame.height(), "FilterRegistry::transform");
        match id {
            FilterId::Gray => kernels::gray(frame),
            FilterId::Binary => kernels::binary(frame, params.threshold),
            FilterId::HistogramEq => kernels::histogram_eq(frame),
            FilterId::Negative => kernels::negative(frame),
            FilterId::Pixelize => kernels::pixelize(frame, params.block_size),
            FilterId::Sobel => kernels::sobel(frame),
            FilterId::Prewitt => kernels::prewitt(frame),
            FilterId::Laplace => kernels::laplace(frame),
            FilterId::Blur => Ok(self.dispatcher.blur(frame)?),
            FilterId::Erode => Ok(self.dispatcher.erode(frame)?),
            FilterId::Dilate => Ok(self.dispatcher.dilate(frame)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefx_core::Channels;

    #[test]
    fn test_every_filter_keeps_size() {
        let registry = FilterRegistry::new(Backend::Cpu);
        let frame = Frame::from_fn(9, 7, Channels::Rgb, |x, y, c| (x * 20 + y * 9 + c as u32) as u8);
        let params = FilterParams::default().with_block_size(4);

        for id in FilterId::ALL {
            let out = registry.transform(id, &frame, &params).unwrap();
            assert_eq!(out.dimensions(), frame.dimensions(), "{id}");
            assert!(out.channel_count() <= frame.channel_count(), "{id}");
        }
    }

    #[test]
    fn test_params_bound_at_call_time() {
        let registry = FilterRegistry::new(Backend::Cpu);
        let frame = Frame::gray(2, 1, vec![50, 150]).unwrap();

        let low = FilterParams::default().with_threshold(10.0);
        let high = FilterParams::default().with_threshold(100.0);
        assert_eq!(registry.transform(FilterId::Binary, &frame, &low).unwrap().data(), &[255, 255]);
        assert_eq!(registry.transform(FilterId::Binary, &frame, &high).unwrap().data(), &[0, 255]);
    }

    #[test]
    fn test_gpu_filters_use_dispatcher() {
        let registry = FilterRegistry::new(Backend::Cpu);
        assert!(!registry.dispatcher().is_acquired());

        let frame = Frame::filled(4, 4, &[7]).unwrap();
        registry.transform(FilterId::Sobel, &frame, &FilterParams::default()).unwrap();
        assert!(!registry.dispatcher().is_acquired());

        registry.transform(FilterId::Dilate, &frame, &FilterParams::default()).unwrap();
        assert!(registry.dispatcher().is_acquired());
    }
}

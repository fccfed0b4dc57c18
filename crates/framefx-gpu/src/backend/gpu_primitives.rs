//! GPU primitives abstraction for unified backend implementation.

use super::{GpuLimits, MorphOp};
use crate::GpuResult;

/// Handle to a single-channel f32 frame in device (or host) memory.
pub trait ImageHandle: Send + Sync {
    /// Frame dimensions (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Width.
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Height.
    fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Size in bytes of memory used.
    fn size_bytes(&self) -> u64 {
        let (w, h) = self.dimensions();
        (w as u64) * (h as u64) * 4 // f32
    }
}

/// Core compute operations abstraction.
pub trait GpuPrimitives: Send + Sync {
    /// Backend-specific image handle type.
    type Handle: ImageHandle;

    /// Upload normalized intensities.
    fn upload(&self, data: &[f32], width: u32, height: u32) -> GpuResult<Self::Handle>;

    /// Download normalized intensities.
    fn download(&self, handle: &Self::Handle) -> GpuResult<Vec<f32>>;

    /// Allocate output buffer.
    fn allocate(&self, width: u32, height: u32) -> GpuResult<Self::Handle>;

    /// Run one of the fixed programs from `src` into `dst`.
    fn exec(&self, op: MorphOp, src: &Self::Handle, dst: &mut Self::Handle) -> GpuResult<()>;

    /// Get limits.
    fn limits(&self) -> &GpuLimits;

    /// Backend name.
    fn name(&self) -> &'static str;
}

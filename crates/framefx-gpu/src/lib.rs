//! Compute dispatch for the hardware-accelerated framefx filters.
//!
//! Three fixed compute programs are provided: a 5x5 box blur, a 3x3 erode
//! (minimum) and a 3x3 dilate (maximum). Each runs over a normalized
//! grayscale copy of the frame, one work item per pixel, and leaves a border
//! band untouched where the window would leave the frame.
//!
//! # Architecture
//!
//! ```text
//! ComputeDispatcher (lazy, cached context)
//!     └── ProcessingBackend (object-safe, one call per dispatch)
//!             └── GpuPrimitives trait
//!                     ├── CpuPrimitives (rayon reference kernels)
//!                     └── WgpuPrimitives (WGSL compute shaders)
//! ```
//!
//! # Example
//!
//! ```
//! use framefx_core::Frame;
//! use framefx_gpu::{Backend, ComputeDispatcher, MorphOp};
//!
//! let dispatcher = ComputeDispatcher::new(Backend::Cpu);
//! let frame = Frame::filled(8, 8, &[200, 10, 10]).unwrap();
//! let out = dispatcher.dispatch(MorphOp::Erode, &frame).unwrap();
//! assert_eq!(out.dimensions(), (8, 8));
//! ```

pub mod backend;
mod dispatch;
mod shaders;

#[cfg(feature = "wgpu")]
pub mod context;

pub use backend::{Backend, GpuLimits, MorphOp, ProcessingBackend, create_backend};
pub use dispatch::ComputeDispatcher;

#[cfg(feature = "wgpu")]
pub use context::GpuContext;

use thiserror::Error;

/// GPU operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Failed to create device: {0}")]
    DeviceCreation(String),

    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Image too large: {width}x{height} exceeds GPU limit {limit}")]
    ImageTooLarge { width: u32, height: u32, limit: u64 },

    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("GPU operation failed: {0}")]
    OperationFailed(String),
}

impl GpuError {
    /// True when no compute context could be acquired at all.
    ///
    /// Callers treat these as "device unavailable" and may retry on a later
    /// frame; every other variant is a failure of a single dispatch.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NoAdapter | Self::BackendNotAvailable(_) | Self::DeviceCreation(_)
        )
    }
}

pub type GpuResult<T> = Result<T, GpuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_unavailable_classification() {
        assert!(GpuError::NoAdapter.is_device_unavailable());
        assert!(GpuError::BackendNotAvailable("wgpu".into()).is_device_unavailable());
        assert!(GpuError::DeviceCreation("lost".into()).is_device_unavailable());
        assert!(!GpuError::InvalidDimensions(0, 4).is_device_unavailable());
        assert!(!GpuError::OperationFailed("map".into()).is_device_unavailable());
    }
}

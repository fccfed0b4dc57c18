//! Compute backends for the morphological filters.
//!
//! Provides a CPU (rayon) reference backend and a wgpu backend with
//! automatic selection.

mod cpu_backend;
mod gpu_primitives;
mod limits;

#[cfg(feature = "wgpu")]
mod wgpu_backend;

pub use cpu_backend::{CpuImage, CpuPrimitives};
pub use gpu_primitives::{GpuPrimitives, ImageHandle};
pub use limits::GpuLimits;

#[cfg(feature = "wgpu")]
pub use wgpu_backend::{WgpuImage, WgpuPrimitives};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{GpuError, GpuResult};

/// Available compute backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Auto-select best available (wgpu > CPU).
    #[default]
    Auto,
    /// CPU reference kernels parallelized with rayon.
    Cpu,
    /// wgpu backend (Vulkan/Metal/DX12). Never falls back to the CPU.
    Wgpu,
}

impl Backend {
    /// Check if this backend is available on current system.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Auto => true,
            Self::Cpu => true,
            #[cfg(feature = "wgpu")]
            Self::Wgpu => WgpuPrimitives::is_available(),
            #[cfg(not(feature = "wgpu"))]
            Self::Wgpu => false,
        }
    }

    /// Lowercase name as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Wgpu => "wgpu",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = GpuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "wgpu" | "gpu" => Ok(Self::Wgpu),
            other => Err(GpuError::BackendNotAvailable(format!("unknown backend '{other}'"))),
        }
    }
}

/// The three fixed compute programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphOp {
    /// 5x5 box average.
    Blur,
    /// 3x3 minimum.
    Erode,
    /// 3x3 maximum.
    Dilate,
}

impl MorphOp {
    /// All programs, in a fixed order.
    pub const ALL: [MorphOp; 3] = [MorphOp::Blur, MorphOp::Erode, MorphOp::Dilate];

    /// Window radius; also the width of the pass-through border band.
    #[inline]
    pub const fn radius(self) -> u32 {
        match self {
            Self::Blur => 2,
            Self::Erode | Self::Dilate => 1,
        }
    }

    /// Compute program entry point.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::Blur => "blur_image",
            Self::Erode => "erode_image",
            Self::Dilate => "dilate_image",
        }
    }

    /// True if (x, y) lies in the interior where the full window fits.
    #[inline]
    pub fn is_interior(self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let r = self.radius();
        x >= r && y >= r && x + r < width && y + r < height
    }
}

/// Object-safe backend used by the dispatcher.
///
/// Every call owns its device buffers for exactly the duration of the call;
/// they are released when the call returns, on success or failure.
pub trait ProcessingBackend: Send + Sync {
    /// Backend name.
    fn name(&self) -> &'static str;

    /// Backend limits.
    fn limits(&self) -> &GpuLimits;

    /// Upload `data`, run `op` over a `width x height` grid, download the result.
    fn run(&self, op: MorphOp, data: &[f32], width: u32, height: u32) -> GpuResult<Vec<f32>>;
}

impl<P: GpuPrimitives> ProcessingBackend for P {
    fn name(&self) -> &'static str {
        GpuPrimitives::name(self)
    }

    fn limits(&self) -> &GpuLimits {
        GpuPrimitives::limits(self)
    }

    fn run(&self, op: MorphOp, data: &[f32], width: u32, height: u32) -> GpuResult<Vec<f32>> {
        trace!(backend = GpuPrimitives::name(self), ?op, width, height, "ProcessingBackend::run");
        if width == 0 || height == 0 {
            return Err(GpuError::InvalidDimensions(width, height));
        }
        GpuPrimitives::limits(self).check(width, height)?;

        let src = self.upload(data, width, height)?;
        let mut dst = self.allocate(width, height)?;
        self.exec(op, &src, &mut dst)?;
        self.download(&dst)
    }
}

/// Create a backend instance.
///
/// `Backend::Auto` tries wgpu first (when compiled in) and falls back to the
/// CPU reference kernels. `Backend::Wgpu` fails instead of falling back.
pub fn create_backend(backend: Backend) -> GpuResult<Arc<dyn ProcessingBackend>> {
    match backend {
        Backend::Auto => {
            #[cfg(feature = "wgpu")]
            {
                match WgpuPrimitives::new() {
                    Ok(p) => return Ok(Arc::new(p)),
                    Err(e) => debug!(error = %e, "wgpu unavailable, falling back to CPU"),
                }
            }
            Ok(Arc::new(CpuPrimitives::new()))
        }
        Backend::Cpu => Ok(Arc::new(CpuPrimitives::new())),
        Backend::Wgpu => {
            #[cfg(feature = "wgpu")]
            {
                Ok(Arc::new(WgpuPrimitives::new()?))
            }
            #[cfg(not(feature = "wgpu"))]
            {
                Err(GpuError::BackendNotAvailable(
                    "wgpu feature not enabled".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("auto".parse::<Backend>().unwrap(), Backend::Auto);
        assert_eq!("CPU".parse::<Backend>().unwrap(), Backend::Cpu);
        assert_eq!("gpu".parse::<Backend>().unwrap(), Backend::Wgpu);
        assert!("cuda".parse::<Backend>().is_err());
    }

    #[test]
    fn test_interior() {
        // 6x6 frame: blur interior is x,y in 2..=3
        assert!(MorphOp::Blur.is_interior(2, 2, 6, 6));
        assert!(MorphOp::Blur.is_interior(3, 3, 6, 6));
        assert!(!MorphOp::Blur.is_interior(1, 3, 6, 6));
        assert!(!MorphOp::Blur.is_interior(4, 3, 6, 6));

        // erode/dilate interior is x,y in 1..=4
        assert!(MorphOp::Erode.is_interior(1, 4, 6, 6));
        assert!(!MorphOp::Dilate.is_interior(0, 3, 6, 6));
        assert!(!MorphOp::Dilate.is_interior(5, 3, 6, 6));
    }

    #[test]
    fn test_entry_points() {
        let names: Vec<_> = MorphOp::ALL.iter().map(|op| op.entry_point()).collect();
        assert_eq!(names, ["blur_image", "erode_image", "dilate_image"]);
    }

    #[test]
    fn test_cpu_always_available() {
        assert!(Backend::Cpu.is_available());
        assert!(create_backend(Backend::Cpu).is_ok());
        assert!(create_backend(Backend::Auto).is_ok());
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn test_wgpu_without_feature() {
        assert!(!Backend::Wgpu.is_available());
        let err = create_backend(Backend::Wgpu).err().unwrap();
        assert!(err.is_device_unavailable());
    }
}

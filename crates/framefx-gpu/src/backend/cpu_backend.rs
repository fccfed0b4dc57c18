//! CPU reference backend.
//!
//! Runs the same three programs as the WGSL shaders, row-parallel with
//! rayon. Interior and border rules match the shaders exactly, so this
//! backend doubles as the reference the wgpu path is checked against.

use rayon::prelude::*;

use super::{GpuLimits, GpuPrimitives, ImageHandle, MorphOp};
use crate::{GpuError, GpuResult};

/// Host-memory frame handle.
#[derive(Clone)]
pub struct CpuImage {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl CpuImage {
    /// Pixel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

impl ImageHandle for CpuImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// CPU implementation of the compute primitives.
pub struct CpuPrimitives {
    limits: GpuLimits,
}

impl CpuPrimitives {
    /// Create CPU primitives.
    pub fn new() -> Self {
        Self {
            limits: GpuLimits::unbounded(),
        }
    }
}

impl Default for CpuPrimitives {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuPrimitives for CpuPrimitives {
    type Handle = CpuImage;

    fn upload(&self, data: &[f32], width: u32, height: u32) -> GpuResult<CpuImage> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(GpuError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(CpuImage {
            data: data.to_vec(),
            width,
            height,
        })
    }

    fn download(&self, handle: &CpuImage) -> GpuResult<Vec<f32>> {
        Ok(handle.data.clone())
    }

    fn allocate(&self, width: u32, height: u32) -> GpuResult<CpuImage> {
        Ok(CpuImage {
            data: vec![0.0; width as usize * height as usize],
            width,
            height,
        })
    }

    fn exec(&self, op: MorphOp, src: &CpuImage, dst: &mut CpuImage) -> GpuResult<()> {
        if src.dimensions() != dst.dimensions() {
            return Err(GpuError::BufferSizeMismatch {
                expected: src.data.len(),
                actual: dst.data.len(),
            });
        }
        let (w, h) = src.dimensions();
        let r = op.radius() as usize;
        let stride = w as usize;
        let input = &src.data;

        dst.data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    if !op.is_interior(x as u32, y as u32, w, h) {
                        *out = input[y * stride + x];
                        continue;
                    }
                    let window = (y - r..=y + r)
                        .flat_map(|sy| (x - r..=x + r).map(move |sx| input[sy * stride + sx]));
                    *out = match op {
                        MorphOp::Blur => window.sum::<f32>() / 25.0,
                        MorphOp::Erode => window.fold(1.0f32, f32::min),
                        MorphOp::Dilate => window.fold(0.0f32, f32::max),
                    };
                }
            });

        Ok(())
    }

    fn limits(&self) -> &GpuLimits {
        &self.limits
    }

    fn name(&self) -> &'static str {
        "cpu"
    }
}

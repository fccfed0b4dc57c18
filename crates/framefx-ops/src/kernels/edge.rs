//! Edge detection: Sobel, Prewitt and Laplace.
//!
//! All three reduce the frame to luma, convolve with fixed 3x3 kernels and
//! rescale the magnitude so the strongest edge maps to 255.
//!
//! # Kernels
//!
//! - [`Kernel3::SOBEL_X`] / [`Kernel3::SOBEL_Y`] - weighted central difference
//! - [`Kernel3::PREWITT_X`] / [`Kernel3::PREWITT_Y`] - unweighted central difference
//! - [`Kernel3::LAPLACE`] - 4-neighbour Laplacian
//!
//! Samples outside the frame repeat the nearest edge pixel, so the output
//! has the same size as the input.

use framefx_core::Frame;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::OpsResult;

/// 3x3 convolution kernel, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3 {
    /// Kernel weights.
    pub data: [f32; 9],
}

impl Kernel3 {
    /// Sobel horizontal gradient.
    #[rustfmt::skip]
    pub const SOBEL_X: Self = Self { data: [
        -1.0, 0.0, 1.0,
        -2.0, 0.0, 2.0,
        -1.0, 0.0, 1.0,
    ] };

    /// Sobel vertical gradient.
    #[rustfmt::skip]
    pub const SOBEL_Y: Self = Self { data: [
        -1.0, -2.0, -1.0,
         0.0,  0.0,  0.0,
         1.0,  2.0,  1.0,
    ] };

    /// Prewitt horizontal gradient.
    #[rustfmt::skip]
    pub const PREWITT_X: Self = Self { data: [
        -1.0, 0.0, 1.0,
        -1.0, 0.0, 1.0,
        -1.0, 0.0, 1.0,
    ] };

    /// Prewitt vertical gradient.
    #[rustfmt::skip]
    pub const PREWITT_Y: Self = Self { data: [
        -1.0, -1.0, -1.0,
         0.0,  0.0,  0.0,
         1.0,  1.0,  1.0,
    ] };

    /// Laplacian.
    #[rustfmt::skip]
    pub const LAPLACE: Self = Self { data: [
         0.0, -1.0,  0.0,
        -1.0,  4.0, -1.0,
         0.0, -1.0,  0.0,
    ] };
}

/// Convolves a single-channel plane with edge clamping.
///
/// `src` must hold `width * height` values and both dimensions must be
/// non-zero.
pub fn convolve3(src: &[f32], width: usize, height: usize, kernel: &Kernel3) -> Vec<f32> {
    trace!(width, height, "convolve3");
    let mut dst = vec![0.0f32; width * height];

    dst.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for ky in 0..3 {
                // Source coordinates with edge clamping
                let sy = (y + ky).saturating_sub(1).min(height - 1);
                for kx in 0..3 {
                    let sx = (x + kx).saturating_sub(1).min(width - 1);
                    sum += src[sy * width + sx] * kernel.data[ky * 3 + kx];
                }
            }
            *out = sum;
        }
    });

    dst
}

/// Sobel gradient magnitude `sqrt(gx^2 + gy^2)`, scaled to 0..=255.
pub fn sobel(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), "sobel");
    gradient(frame, &Kernel3::SOBEL_X, &Kernel3::SOBEL_Y)
}

/// Prewitt gradient magnitude `sqrt(gx^2 + gy^2)`, scaled to 0..=255.
pub fn prewitt(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), "prewitt");
    gradient(frame, &Kernel3::PREWITT_X, &Kernel3::PREWITT_Y)
}

/// Absolute Laplacian response, scaled to 0..=255.
pub fn laplace(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), "laplace");
    let gray = frame.to_gray();
    if gray.is_empty() {
        return Ok(gray);
    }
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let plane = as_plane(&gray);

    let mag: Vec<f32> = convolve3(&plane, w, h, &Kernel3::LAPLACE)
        .into_iter()
        .map(f32::abs)
        .collect();
    Ok(gray.with_data(scale_to_u8(&mag))?)
}

fn gradient(frame: &Frame, kx: &Kernel3, ky: &Kernel3) -> OpsResult<Frame> {
    let gray = frame.to_gray();
    if gray.is_empty() {
        return Ok(gray);
    }
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let plane = as_plane(&gray);

    let gx = convolve3(&plane, w, h, kx);
    let gy = convolve3(&plane, w, h, ky);
    let mag: Vec<f32> = gx
        .par_iter()
        .zip(gy.par_iter())
        .map(|(a, b)| (a * a + b * b).sqrt())
        .collect();
    Ok(gray.with_data(scale_to_u8(&mag))?)
}

fn as_plane(gray: &Frame) -> Vec<f32> {
    gray.data().iter().map(|&v| v as f32).collect()
}

/// Rescales non-negative magnitudes by `255 / max`, rounding.
///
/// An all-zero input has no scale; it maps to all zeros.
pub fn scale_to_u8(values: &[f32]) -> Vec<u8> {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        debug!("zero magnitude, skipping normalization");
        return vec![0; values.len()];
    }
    let scale = 255.0 / max;
    values
        .par_iter()
        .map(|&v| (v * scale).round().clamp(0.0, 255.0) as u8)
        .collect()
}

//! Per-sample color kernels: grayscale, negative, binary threshold.
//!
//! # Example
//!
//! ```rust
//! use framefx_core::Frame;
//! use framefx_ops::kernels::{binary, gray, negative};
//!
//! let frame = Frame::filled(4, 4, &[255, 255, 255]).unwrap();
//! let out = negative(&gray(&frame).unwrap()).unwrap();
//! assert!(out.data().iter().all(|&v| v == 0));
//!
//! let mask = binary(&frame, 127.0).unwrap();
//! assert!(mask.data().iter().all(|&v| v == 255));
//! ```

use framefx_core::{Channels, Frame};
use rayon::prelude::*;
use tracing::trace;

use crate::OpsResult;

/// Reduces a three-channel frame to luma; single-channel frames pass through.
pub fn gray(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), channels = frame.channel_count(), "gray");
    Ok(frame.to_gray())
}

/// `255 - x` for every sample.
pub fn negative(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), "negative");
    map_samples(frame, |v| 255 - v)
}

/// 255 where the sample is strictly above `threshold`, else 0.
///
/// Applied per sample, so three-channel frames threshold each channel.
pub fn binary(frame: &Frame, threshold: f32) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), threshold, "binary");
    map_samples(frame, |v| if v as f32 > threshold { 255 } else { 0 })
}

/// Replicates a single channel into three; three-channel frames pass through.
pub fn gray_to_rgb(frame: &Frame) -> OpsResult<Frame> {
    match frame.channels() {
        Channels::Rgb => Ok(frame.clone()),
        Channels::Gray => {
            let data: Vec<u8> = frame.data().par_iter().flat_map_iter(|&v| [v, v, v]).collect();
            Ok(Frame::rgb(frame.width(), frame.height(), data)?)
        }
    }
}

fn map_samples<F>(frame: &Frame, f: F) -> OpsResult<Frame>
where
    F: Fn(u8) -> u8 + Sync,
{
    let data: Vec<u8> = frame.data().par_iter().map(|&v| f(v)).collect();
    Ok(frame.with_data(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rgb() -> Frame {
        Frame::from_fn(5, 3, Channels::Rgb, |x, y, c| (x * 50 + y * 20 + c as u32 * 7) as u8)
    }

    #[test]
    fn test_gray_idempotent() {
        let frame = sample_rgb();
        let once = gray(&frame).unwrap();
        let twice = gray(&once).unwrap();
        assert_eq!(once.channels(), Channels::Gray);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_gray_weights() {
        let frame = Frame::rgb(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        assert_eq!(gray(&frame).unwrap().data(), &[76, 150, 29]);
    }

    #[test]
    fn test_negative_involution() {
        let frame = sample_rgb();
        let back = negative(&negative(&frame).unwrap()).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_binary_values() {
        let frame = sample_rgb();
        let out = binary(&frame, 100.0).unwrap();
        assert_eq!(out.channels(), Channels::Rgb);
        assert!(out.data().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_binary_rows() {
        // rows 0, 127, 128, 255 with threshold 127
        let frame = Frame::from_fn(3, 4, Channels::Gray, |_, y, _| [0, 127, 128, 255][y as usize]);
        let out = binary(&frame, 127.0).unwrap();
        for (y, expected) in [0u8, 0, 255, 255].into_iter().enumerate() {
            for x in 0..3 {
                assert_eq!(out.pixel(x, y as u32), &[expected]);
            }
        }
    }

    #[test]
    fn test_gray_to_rgb() {
        let frame = Frame::gray(2, 1, vec![9, 200]).unwrap();
        let rgb = gray_to_rgb(&frame).unwrap();
        assert_eq!(rgb.channels(), Channels::Rgb);
        assert_eq!(rgb.data(), &[9, 9, 9, 200, 200, 200]);
        assert_eq!(gray(&rgb).unwrap(), frame);
    }
}

//! Frame buffer type for the filter pipeline.
//!
//! A [`Frame`] is a rectangular array of 8-bit samples with either one
//! channel (grayscale) or three interleaved channels. Channel order is fixed
//! by whoever captured the frame and is never reordered by the pipeline.
//!
//! # Memory Layout
//!
//! Samples are stored row-major, top-to-bottom:
//!
//! ```text
//! Memory: [C0 C1 C2 C0 C1 C2 ...]  <- Row 0
//!         [C0 C1 C2 C0 C1 C2 ...]  <- Row 1
//!         ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use framefx_core::{Channels, Frame};
//!
//! let frame = Frame::filled(4, 2, &[255, 0, 0]).unwrap();
//! assert_eq!(frame.channels(), Channels::Rgb);
//! assert_eq!(frame.pixel(3, 1), &[255, 0, 0]);
//!
//! let gray = frame.to_gray();
//! assert_eq!(gray.channels(), Channels::Gray);
//! ```

use crate::{luma, Error, Result};
use rayon::prelude::*;
use std::fmt;

/// Channel layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Single luminance channel.
    Gray,
    /// Three interleaved color channels.
    Rgb,
}

impl Channels {
    /// Number of samples per pixel.
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }

    /// Layout for a given samples-per-pixel count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for anything but 1 or 3.
    pub fn from_count(count: usize) -> Result<Self> {
        match count {
            1 => Ok(Self::Gray),
            3 => Ok(Self::Rgb),
            n => Err(Error::UnsupportedChannels(n)),
        }
    }
}

/// Owned 8-bit frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: Channels,
}

impl Frame {
    /// Creates a frame filled with zeros.
    pub fn new(width: u32, height: u32, channels: Channels) -> Self {
        let len = width as usize * height as usize * channels.count();
        Self {
            data: vec![0; len],
            width,
            height,
            channels,
        }
    }

    /// Creates a frame from existing sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data` does not hold exactly
    /// `width * height * channels` samples.
    pub fn from_raw(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a single-channel frame from existing data.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, Channels::Gray, data)
    }

    /// Creates a three-channel frame from existing interleaved data.
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, Channels::Rgb, data)
    }

    /// Creates a frame where every pixel equals `pixel`.
    ///
    /// The channel layout is taken from `pixel.len()`.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        let channels = Channels::from_count(pixel.len())?;
        let data = pixel.repeat(width as usize * height as usize);
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a frame by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: u32, height: u32, channels: Channels, mut f: F) -> Self
    where
        F: FnMut(u32, u32, usize) -> u8,
    {
        let c = channels.count();
        let mut data = Vec::with_capacity(width as usize * height as usize * c);
        for y in 0..height {
            for x in 0..width {
                for ch in 0..c {
                    data.push(f(x, y, ch));
                }
            }
        }
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Samples per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.count()
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples per row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels.count()
    }

    /// True if the frame has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with [`Error::EmptyFrame`] if the frame has no pixels.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Raw sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw sample data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the frame and returns its sample buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Samples of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the frame.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels.count();
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.data[idx..idx + c]
    }

    /// Returns a new frame with the same geometry and layout but new samples.
    pub fn with_data(&self, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(self.width, self.height, self.channels, data)
    }

    /// Single-channel luma version of this frame.
    ///
    /// Grayscale frames are returned as a plain copy.
    pub fn to_gray(&self) -> Frame {
        match self.channels {
            Channels::Gray => self.clone(),
            Channels::Rgb => {
                let data: Vec<u8> = self
                    .data
                    .par_chunks_exact(3)
                    .map(|px| luma([px[0], px[1], px[2]]))
                    .collect();
                Self {
                    data,
                    width: self.width,
                    height: self.height,
                    channels: Channels::Gray,
                }
            }
        }
    }

    /// Intensities normalized to `[0, 1]`, one value per pixel.
    ///
    /// Three-channel frames are reduced to luma first.
    pub fn to_normalized_gray(&self) -> Vec<f32> {
        let gray = self.to_gray();
        gray.data.iter().map(|&v| v as f32 / 255.0).collect()
    }

    /// Builds a grayscale frame from normalized intensities.
    ///
    /// Values are scaled by 255, rounded and saturated to `[0, 255]`.
    pub fn from_normalized_gray(width: u32, height: u32, values: &[f32]) -> Result<Self> {
        let data = values
            .iter()
            .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect();
        Self::gray(width, height, data)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("samples", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_size_check() {
        assert!(Frame::gray(2, 2, vec![0; 4]).is_ok());
        let err = Frame::rgb(2, 2, vec![0; 4]).unwrap_err();
        assert_eq!(err, Error::BufferSizeMismatch { expected: 12, actual: 4 });
    }

    #[test]
    fn test_filled_and_pixel() {
        let frame = Frame::filled(3, 2, &[10, 20, 30]).unwrap();
        assert_eq!(frame.channels(), Channels::Rgb);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), &[10, 20, 30]);
    }

    #[test]
    fn test_filled_rejects_two_channels() {
        assert_eq!(
            Frame::filled(1, 1, &[0, 0]).unwrap_err(),
            Error::UnsupportedChannels(2)
        );
    }

    #[test]
    fn test_empty() {
        let frame = Frame::new(0, 10, Channels::Rgb);
        assert!(frame.is_empty());
        assert_eq!(
            frame.ensure_non_empty().unwrap_err(),
            Error::EmptyFrame { width: 0, height: 10 }
        );
        assert!(Frame::new(1, 1, Channels::Gray).ensure_non_empty().is_ok());
    }

    #[test]
    fn test_from_fn_layout() {
        let frame = Frame::from_fn(2, 2, Channels::Rgb, |x, y, c| (x * 100 + y * 10) as u8 + c as u8);
        assert_eq!(frame.pixel(1, 0), &[100, 101, 102]);
        assert_eq!(frame.pixel(0, 1), &[10, 11, 12]);
    }

    #[test]
    fn test_to_gray() {
        let frame = Frame::filled(2, 2, &[255, 255, 255]).unwrap();
        let gray = frame.to_gray();
        assert_eq!(gray.channels(), Channels::Gray);
        assert!(gray.data().iter().all(|&v| v == 255));

        // Already gray: untouched
        let g = Frame::gray(2, 1, vec![3, 7]).unwrap();
        assert_eq!(g.to_gray(), g);
    }

    #[test]
    fn test_normalized_gray() {
        let frame = Frame::gray(3, 1, vec![0, 51, 255]).unwrap();
        let norm = frame.to_normalized_gray();
        assert_eq!(norm, vec![0.0, 0.2, 1.0]);

        let back = Frame::from_normalized_gray(3, 1, &norm).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_from_normalized_saturates() {
        let f = Frame::from_normalized_gray(2, 1, &[-0.5, 1.5]).unwrap();
        assert_eq!(f.data(), &[0, 255]);
    }
}

//! Error types for frame construction and validation.
//!
//! # Usage
//!
//! ```rust
//! use framefx_core::{Channels, Error, Frame};
//!
//! let err = Frame::from_raw(4, 4, Channels::Rgb, vec![0; 10]).unwrap_err();
//! assert!(matches!(err, Error::BufferSizeMismatch { expected: 48, actual: 10 }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or validating a [`crate::Frame`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Frame has no pixels.
    ///
    /// The filter engine rejects such frames before any convolution runs.
    #[error("empty frame: {width}x{height}")]
    EmptyFrame {
        /// Frame width
        width: u32,
        /// Frame height
        height: u32,
    },

    /// Sample buffer length does not match `width * height * channels`.
    #[error("buffer size mismatch: expected {expected} samples, got {actual}")]
    BufferSizeMismatch {
        /// Expected number of samples
        expected: usize,
        /// Actual number of samples
        actual: usize,
    },

    /// Channel count other than 1 or 3.
    #[error("unsupported channel count: {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),
}

impl Error {
    /// True for errors that describe a zero-size or malformed frame.
    pub fn is_malformed_frame(&self) -> bool {
        matches!(self, Self::EmptyFrame { .. } | Self::BufferSizeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::EmptyFrame { width: 0, height: 480 };
        assert_eq!(err.to_string(), "empty frame: 0x480");

        let err = Error::UnsupportedChannels(4);
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_malformed_classification() {
        assert!(Error::EmptyFrame { width: 0, height: 0 }.is_malformed_frame());
        assert!(Error::BufferSizeMismatch { expected: 3, actual: 2 }.is_malformed_frame());
        assert!(!Error::UnsupportedChannels(2).is_malformed_frame());
    }
}

//! # framefx-core
//!
//! Core types for the framefx video filter pipeline.
//!
//! This crate provides the foundational types shared by every other framefx crate:
//!
//! - [`Frame`] - Owned 8-bit frame buffer, one or three interleaved channels
//! - [`Channels`] - Channel layout of a frame
//! - [`Error`] - Frame construction and validation errors
//! - [`luma`] - Grayscale weighting used by every channel-reducing stage
//!
//! ## Crate Structure
//!
//! ```text
//! framefx-core (this crate)
//!    ^
//!    |
//!    +-- framefx-gpu (compute dispatch for blur/erode/dilate)
//!    +-- framefx-ops (pixel kernels, filter chain, engine)
//!    +-- framefx-cli (frame sequence driver)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod frame;
pub mod pixel;

pub use error::{Error, Result};
pub use frame::{Channels, Frame};
pub use pixel::{luma, LUMA, LUMA_B, LUMA_G, LUMA_R};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use framefx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::frame::{Channels, Frame};
    pub use crate::pixel::{luma, LUMA};
}

//! Stateless pixel kernels.
//!
//! Every kernel takes a frame by reference and returns a new one of the same
//! size. Channel count is either preserved or reduced to one; no kernel
//! increases it except [`gray_to_rgb`], which is never part of a chain.
//! All kernels accept both one- and three-channel input.

mod color;
mod edge;
mod histogram;
mod pixelize;

pub use color::{binary, gray, gray_to_rgb, negative};
pub use edge::{convolve3, laplace, prewitt, scale_to_u8, sobel, Kernel3};
pub use histogram::{equalization_lut, histogram, histogram_eq, Histogram};
pub use pixelize::pixelize;

//! # framefx-ops
//!
//! Filter pipeline engine for live video frames.
//!
//! A frame passes through a user-ordered chain of filters each cycle. Eight
//! filters are plain pixel kernels; blur, erode and dilate run through the
//! compute dispatcher from `framefx-gpu`.
//!
//! # Modules
//!
//! - [`kernels`] - Stateless pixel kernels (gray, binary, pixelize, edges, ...)
//! - [`FilterChain`] - Ordered set of active filters with toggle/move
//! - [`FilterRegistry`] - Filter id to transform lookup
//! - [`FilterEngine`] - Runs a chain over one frame
//! - [`Pipeline`] - Lock-protected chain and parameters for a session
//!
//! # Example
//!
//! ```rust
//! use framefx_core::Frame;
//! use framefx_gpu::Backend;
//! use framefx_ops::{FilterChain, FilterEngine, FilterId, FilterParams};
//!
//! let mut chain = FilterChain::new();
//! chain.toggle(FilterId::Gray);
//! chain.toggle(FilterId::Sobel);
//!
//! let engine = FilterEngine::new(Backend::Cpu);
//! let frame = Frame::filled(32, 24, &[200, 120, 40]).unwrap();
//! let out = engine.apply(&chain, &frame, &FilterParams::default(), &[]).unwrap();
//! assert_eq!(out.dimensions(), (32, 24));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chain;
mod engine;
mod error;
mod filter_id;
pub mod kernels;
mod params;
pub mod pipeline;
mod registry;

pub use chain::{FilterChain, FilterStatus};
pub use engine::FilterEngine;
pub use error::{OpsError, OpsResult};
pub use filter_id::FilterId;
pub use params::FilterParams;
pub use pipeline::Pipeline;
pub use registry::FilterRegistry;

pub use framefx_gpu::Backend;

//! Scalar filter parameters.

use crate::{OpsError, OpsResult};

/// Parameter snapshot passed to every filter invocation.
///
/// The engine never reads parameters from shared state; callers take a copy
/// between frames and pass it explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Binary threshold on the 0..=255 axis.
    pub threshold: f32,
    /// Pixelize tile edge length, positive.
    pub block_size: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            threshold: 127.0,
            block_size: 15,
        }
    }
}

impl FilterParams {
    /// Validated parameters.
    pub fn new(threshold: f32, block_size: u32) -> OpsResult<Self> {
        let params = Self { threshold, block_size };
        params.validate()?;
        Ok(params)
    }

    /// Copy with a different threshold.
    pub fn with_threshold(self, threshold: f32) -> Self {
        Self { threshold, ..self }
    }

    /// Copy with a different block size.
    pub fn with_block_size(self, block_size: u32) -> Self {
        Self { block_size, ..self }
    }

    /// Checks that the threshold is finite and the block size positive.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.threshold.is_finite() {
            return Err(OpsError::InvalidParameter(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.block_size == 0 {
            return Err(OpsError::InvalidParameter("block size must be positive".into()));
        }
        Ok(())
    }
}

//! Device limits for dispatch validation.

use crate::{GpuError, GpuResult};

/// Workgroup edge length used by the 2-D compute programs.
pub const WORKGROUP_DIM: u32 = 16;

/// Compute resource limits.
#[derive(Debug, Clone)]
pub struct GpuLimits {
    /// Maximum size in bytes of a single storage buffer binding.
    pub max_buffer_bytes: u64,
    /// Maximum number of workgroups per dispatch dimension.
    pub max_workgroups_per_dim: u32,
}

impl Default for GpuLimits {
    fn default() -> Self {
        Self {
            max_buffer_bytes: 128 * 1024 * 1024, // 128 MB
            max_workgroups_per_dim: 65535,
        }
    }
}

impl GpuLimits {
    /// Limits for host execution: only addressable memory applies.
    pub fn unbounded() -> Self {
        Self {
            max_buffer_bytes: u64::MAX,
            max_workgroups_per_dim: u32::MAX,
        }
    }

    /// Bytes needed for one normalized f32 frame.
    #[inline]
    pub fn frame_bytes(width: u32, height: u32) -> u64 {
        (width as u64) * (height as u64) * 4
    }

    /// Check that a `width x height` frame fits one buffer and one dispatch.
    pub fn check(&self, width: u32, height: u32) -> GpuResult<()> {
        let bytes = Self::frame_bytes(width, height);
        if bytes > self.max_buffer_bytes {
            return Err(GpuError::ImageTooLarge {
                width,
                height,
                limit: self.max_buffer_bytes,
            });
        }
        let groups = width.div_ceil(WORKGROUP_DIM).max(height.div_ceil(WORKGROUP_DIM));
        if groups > self.max_workgroups_per_dim {
            return Err(GpuError::ImageTooLarge {
                width,
                height,
                limit: self.max_workgroups_per_dim as u64 * WORKGROUP_DIM as u64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_accept_hd() {
        assert!(GpuLimits::default().check(1920, 1080).is_ok());
    }

    #[test]
    fn test_buffer_limit() {
        let limits = GpuLimits {
            max_buffer_bytes: 1024,
            max_workgroups_per_dim: 65535,
        };
        assert!(limits.check(16, 16).is_ok()); // exactly 1024 bytes
        assert!(matches!(
            limits.check(17, 16),
            Err(GpuError::ImageTooLarge { width: 17, height: 16, limit: 1024 })
        ));
    }

    #[test]
    fn test_workgroup_limit() {
        let limits = GpuLimits {
            max_buffer_bytes: u64::MAX,
            max_workgroups_per_dim: 2,
        };
        assert!(limits.check(32, 32).is_ok());
        assert!(limits.check(33, 1).is_err());
    }
}

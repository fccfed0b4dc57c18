//! Error types for the filter pipeline.

use framefx_gpu::GpuError;
use thiserror::Error;

/// Error type for filter operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// Filter name outside the fixed set.
    #[error("invalid filter id: {0}")]
    InvalidFilterId(String),

    /// Zero-size or malformed frame.
    #[error("empty frame: {0}")]
    EmptyFrame(String),

    /// No compute device or context could be acquired.
    #[error("compute device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A compute dispatch failed after the context was acquired.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// Frame construction error not covered above.
    #[error(transparent)]
    Frame(framefx_core::Error),
}

impl From<framefx_core::Error> for OpsError {
    fn from(e: framefx_core::Error) -> Self {
        if e.is_malformed_frame() {
            Self::EmptyFrame(e.to_string())
        } else {
            Self::Frame(e)
        }
    }
}

impl From<GpuError> for OpsError {
    fn from(e: GpuError) -> Self {
        match e {
            e if e.is_device_unavailable() => Self::DeviceUnavailable(e.to_string()),
            GpuError::InvalidDimensions(w, h) => Self::EmptyFrame(format!("{w}x{h}")),
            e => Self::Dispatch(e.to_string()),
        }
    }
}

/// Result type for filter operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_error_mapping() {
        assert!(matches!(
            OpsError::from(GpuError::NoAdapter),
            OpsError::DeviceUnavailable(_)
        ));
        assert!(matches!(
            OpsError::from(GpuError::BackendNotAvailable("wgpu".into())),
            OpsError::DeviceUnavailable(_)
        ));
        assert_eq!(
            OpsError::from(GpuError::InvalidDimensions(0, 2)),
            OpsError::EmptyFrame("0x2".into())
        );
        assert!(matches!(
            OpsError::from(GpuError::OperationFailed("map".into())),
            OpsError::Dispatch(_)
        ));
    }

    #[test]
    fn test_core_error_mapping() {
        let e = framefx_core::Error::EmptyFrame { width: 0, height: 0 };
        assert!(matches!(OpsError::from(e), OpsError::EmptyFrame(_)));

        let e = framefx_core::Error::UnsupportedChannels(4);
        assert_eq!(OpsError::from(e.clone()), OpsError::Frame(e));
    }
}

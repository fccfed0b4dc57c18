//! Filter identifiers.

use std::fmt;
use std::str::FromStr;

use framefx_gpu::MorphOp;

use crate::OpsError;

/// The fixed set of filters a chain can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterId {
    /// Luma reduction.
    Gray,
    /// Threshold to 0/255.
    Binary,
    /// Histogram equalization.
    HistogramEq,
    /// `255 - x`.
    Negative,
    /// Block averaging.
    Pixelize,
    /// Sobel edge magnitude.
    Sobel,
    /// Prewitt edge magnitude.
    Prewitt,
    /// Laplacian edge magnitude.
    Laplace,
    /// 5x5 box blur (compute dispatch).
    Blur,
    /// 3x3 erode (compute dispatch).
    Erode,
    /// 3x3 dilate (compute dispatch).
    Dilate,
}

impl FilterId {
    /// Number of filters.
    pub const COUNT: usize = 11;

    /// All filters, in listing order.
    pub const ALL: [FilterId; Self::COUNT] = [
        Self::Gray,
        Self::Binary,
        Self::HistogramEq,
        Self::Negative,
        Self::Pixelize,
        Self::Sobel,
        Self::Prewitt,
        Self::Laplace,
        Self::Blur,
        Self::Erode,
        Self::Dilate,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Binary => "binary",
            Self::HistogramEq => "histogram_eq",
            Self::Negative => "negative",
            Self::Pixelize => "pixelize",
            Self::Sobel => "sobel",
            Self::Prewitt => "prewitt",
            Self::Laplace => "laplace",
            Self::Blur => "blur",
            Self::Erode => "erode",
            Self::Dilate => "dilate",
        }
    }

    /// Position in [`FilterId::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Compute program backing this filter, if any.
    pub const fn morph_op(self) -> Option<MorphOp> {
        match self {
            Self::Blur => Some(MorphOp::Blur),
            Self::Erode => Some(MorphOp::Erode),
            Self::Dilate => Some(MorphOp::Dilate),
            _ => None,
        }
    }

    /// True for filters that run through the compute dispatcher.
    pub const fn is_gpu(self) -> bool {
        self.morph_op().is_some()
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterId {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| OpsError::InvalidFilterId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_names() {
        for id in FilterId::ALL {
            assert_eq!(id.name().parse::<FilterId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            "sharpen".parse::<FilterId>().unwrap_err(),
            OpsError::InvalidFilterId("sharpen".into())
        );
        // Names are lowercase only
        assert!("Gray".parse::<FilterId>().is_err());
    }

    #[test]
    fn test_index_matches_all() {
        for (i, id) in FilterId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_gpu_filters() {
        let gpu: Vec<_> = FilterId::ALL.into_iter().filter(|id| id.is_gpu()).collect();
        assert_eq!(gpu, [FilterId::Blur, FilterId::Erode, FilterId::Dilate]);
    }
}

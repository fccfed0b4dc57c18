//! Block averaging.

use framefx_core::Frame;
use rayon::prelude::*;
use tracing::trace;

use crate::{OpsError, OpsResult};

/// Replaces each `block_size x block_size` tile with its per-channel mean.
///
/// Tiles start at (0, 0) and do not overlap; tiles in the last row and
/// column are truncated at the frame edge. Means are accumulated in `u64`
/// and rounded down.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `block_size` is zero.
///
/// # Example
///
/// ```rust
/// use framefx_core::Frame;
/// use framefx_ops::kernels::pixelize;
///
/// let frame = Frame::gray(2, 1, vec![10, 13]).unwrap();
/// assert_eq!(pixelize(&frame, 2).unwrap().data(), &[11, 11]);
/// ```
pub fn pixelize(frame: &Frame, block_size: u32) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), block_size, "pixelize");
    if block_size == 0 {
        return Err(OpsError::InvalidParameter("block size must be positive".into()));
    }

    let mut out = frame.clone();
    let row_len = frame.row_len();
    if row_len == 0 || frame.height() == 0 {
        return Ok(out);
    }

    let width = frame.width() as usize;
    let channels = frame.channel_count();
    let block = block_size as usize;

    // One band of `block` rows per task; the last band may be shorter.
    out.data_mut()
        .par_chunks_mut(row_len * block)
        .for_each(|band| {
            let rows = band.len() / row_len;
            for x0 in (0..width).step_by(block) {
                let x1 = (x0 + block).min(width);
                let count = ((x1 - x0) * rows) as u64;
                for c in 0..channels {
                    let mut sum = 0u64;
                    for row in band.chunks_exact(row_len) {
                        for x in x0..x1 {
                            sum += row[x * channels + c] as u64;
                        }
                    }
                    let mean = (sum / count) as u8;
                    for row in band.chunks_exact_mut(row_len) {
                        for x in x0..x1 {
                            row[x * channels + c] = mean;
                        }
                    }
                }
            }
        });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefx_core::Channels;

    #[test]
    fn test_constant_frame_unchanged() {
        let frame = Frame::filled(17, 9, &[40, 90, 200]).unwrap();
        for k in [1, 2, 3, 5, 15, 64] {
            assert_eq!(pixelize(&frame, k).unwrap(), frame, "block {k}");
        }
    }

    #[test]
    fn test_quadrant_floor_means() {
        // 4x4 with four 2x2 quadrants, each holding distinct values
        #[rustfmt::skip]
        let data = vec![
            10, 11,  100, 103,
            11, 11,  100, 100,
            0,  1,   255, 254,
            2,  2,   254, 254,
        ];
        let frame = Frame::gray(4, 4, data).unwrap();
        let out = pixelize(&frame, 2).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            10, 10, 100, 100,
            10, 10, 100, 100,
            1,  1,  254, 254,
            1,  1,  254, 254,
        ];
        assert_eq!(out.data(), expected.as_slice());
    }

    #[test]
    fn test_truncated_edge_tiles() {
        // 3x1 with block 2: tiles [0,1] and [2]
        let frame = Frame::gray(3, 1, vec![0, 9, 77]).unwrap();
        assert_eq!(pixelize(&frame, 2).unwrap().data(), &[4, 4, 77]);
    }

    #[test]
    fn test_per_channel() {
        let frame = Frame::rgb(2, 1, vec![0, 100, 255, 10, 50, 255]).unwrap();
        let out = pixelize(&frame, 2).unwrap();
        assert_eq!(out.data(), &[5, 75, 255, 5, 75, 255]);
        assert_eq!(out.channels(), Channels::Rgb);
    }

    #[test]
    fn test_zero_block_rejected() {
        let frame = Frame::filled(2, 2, &[1]).unwrap();
        assert!(matches!(pixelize(&frame, 0), Err(OpsError::InvalidParameter(_))));
    }
}

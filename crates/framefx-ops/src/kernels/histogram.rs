//! Intensity histogram and histogram equalization.

use framefx_core::Frame;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::OpsResult;

/// 256-bin intensity histogram.
pub type Histogram = [u64; 256];

/// Counts luma values; three-channel frames are reduced to grayscale first.
pub fn histogram(frame: &Frame) -> Histogram {
    let gray = frame.to_gray();
    gray.data()
        .par_chunks(64 * 1024)
        .fold(
            || [0u64; 256],
            |mut h, chunk| {
                for &v in chunk {
                    h[v as usize] += 1;
                }
                h
            },
        )
        .reduce(
            || [0u64; 256],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        )
}

/// Lookup table mapping each intensity to `round(255 * cdf[x])`.
///
/// Returns `None` when the histogram is empty.
pub fn equalization_lut(hist: &Histogram) -> Option<[u8; 256]> {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return None;
    }
    let mut lut = [0u8; 256];
    let mut cumulative = 0u64;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *slot = (255.0 * cumulative as f64 / total as f64).round() as u8;
    }
    Some(lut)
}

/// Histogram equalization on the luma channel.
///
/// The output is always single-channel. A frame with no pixels is returned
/// unchanged.
pub fn histogram_eq(frame: &Frame) -> OpsResult<Frame> {
    trace!(w = frame.width(), h = frame.height(), "histogram_eq");
    let hist = histogram(frame);
    let Some(lut) = equalization_lut(&hist) else {
        debug!("histogram_eq on empty frame, returning input");
        return Ok(frame.clone());
    };

    let gray = frame.to_gray();
    let data: Vec<u8> = gray.data().par_iter().map(|&v| lut[v as usize]).collect();
    Ok(gray.with_data(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefx_core::Channels;

    fn ramp() -> Frame {
        Frame::from_fn(16, 8, Channels::Rgb, |x, y, c| ((x * 13 + y * 29 + c as u32 * 5) % 200) as u8)
    }

    #[test]
    fn test_histogram_counts() {
        let frame = Frame::gray(4, 1, vec![0, 0, 7, 255]).unwrap();
        let h = histogram(&frame);
        assert_eq!(h[0], 2);
        assert_eq!(h[7], 1);
        assert_eq!(h[255], 1);
        assert_eq!(h.iter().sum::<u64>(), 4);
    }

    #[test]
    fn test_equalization_monotonic() {
        let frame = ramp();
        let gray = frame.to_gray();
        let out = histogram_eq(&frame).unwrap();
        assert_eq!(out.channels(), Channels::Gray);

        let lut = equalization_lut(&histogram(&frame)).unwrap();
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));

        for (a, oa) in gray.data().iter().zip(out.data()) {
            for (b, ob) in gray.data().iter().zip(out.data()) {
                if a <= b {
                    assert!(oa <= ob);
                }
            }
        }
    }

    #[test]
    fn test_equalization_top_maps_to_white() {
        let frame = Frame::gray(3, 1, vec![10, 20, 30]).unwrap();
        let out = histogram_eq(&frame).unwrap();
        // cdf: 1/3, 2/3, 1
        assert_eq!(out.data(), &[85, 170, 255]);
    }

    #[test]
    fn test_empty_frame_unchanged() {
        let frame = Frame::new(0, 4, Channels::Rgb);
        assert_eq!(histogram_eq(&frame).unwrap(), frame);
        assert!(equalization_lut(&[0; 256]).is_none());
    }
}

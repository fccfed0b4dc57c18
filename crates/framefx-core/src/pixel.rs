//! Pixel-level helpers shared by the CPU kernels and the compute dispatcher.

/// Luma coefficient for the red channel.
pub const LUMA_R: f32 = 0.2989;

/// Luma coefficient for the green channel.
pub const LUMA_G: f32 = 0.5870;

/// Luma coefficient for the blue channel.
pub const LUMA_B: f32 = 0.1140;

/// Luma coefficients as an array [R, G, B].
pub const LUMA: [f32; 3] = [LUMA_R, LUMA_G, LUMA_B];

/// Weighted grayscale value of an 8-bit RGB sample, rounded to nearest.
///
/// `Y = round(0.2989*R + 0.5870*G + 0.1140*B)`
///
/// # Example
/// ```
/// use framefx_core::luma;
/// assert_eq!(luma([255, 255, 255]), 255);
/// assert_eq!(luma([0, 0, 0]), 0);
/// ```
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let y = rgb[0] as f32 * LUMA_R + rgb[1] as f32 * LUMA_G + rgb[2] as f32 * LUMA_B;
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coefficients_sum() {
        let sum: f32 = LUMA.iter().sum();
        assert_relative_eq!(sum, 0.9999, epsilon = 1e-6);
    }

    #[test]
    fn test_luma_primaries() {
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
        assert_eq!(luma([0, 0, 255]), 29);
    }

    #[test]
    fn test_luma_gray_is_identity() {
        for v in [0u8, 1, 17, 127, 128, 200, 254, 255] {
            assert_eq!(luma([v, v, v]), v);
        }
    }
}

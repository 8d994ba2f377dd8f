//! The brightness metric that decides which pixel wins.
//!
//! A light trail keeps, at every pixel position, the brightest colour seen
//! across the whole frame sequence. "Brightest" is defined here as the squared
//! Euclidean norm of the RGB vector: cheap integer arithmetic, and since only
//! relative ordering matters there is no need for a square root.

/// The largest possible [`intensity`] value: `3 × 255²`, reached by pure
/// white.
pub const MAX_INTENSITY: u32 = 3 * 255 * 255;

/// Squared-norm brightness of an RGB pixel.
///
/// Pure and total: `intensity(r, g, b) = r² + g² + b²`, in the range
/// `0..=`[`MAX_INTENSITY`]. Monotonic non-decreasing in each channel
/// independently.
///
/// # Example
///
/// ```
/// use lighttrail::intensity;
///
/// assert_eq!(intensity(0, 0, 0), 0);
/// assert_eq!(intensity(10, 0, 0), 100);
/// // (2,0,0) outshines (1,1,1): 4 > 3, channel count does not matter.
/// assert!(intensity(2, 0, 0) > intensity(1, 1, 1));
/// ```
#[inline]
pub const fn intensity(red: u8, green: u8, blue: u8) -> u32 {
    let r = red as u32;
    let g = green as u32;
    let b = blue as u32;
    r * r + g * g + b * b
}

/// [`intensity`] over a packed `[r, g, b]` triple, as stored in raw RGB24
/// pixel buffers.
#[inline]
pub(crate) fn intensity_of(pixel: &[u8]) -> u32 {
    intensity(pixel[0], pixel[1], pixel[2])
}

#[cfg(test)]
mod tests {
    use super::{MAX_INTENSITY, intensity, intensity_of};

    #[test]
    fn matches_squared_norm() {
        assert_eq!(intensity(0, 0, 0), 0);
        assert_eq!(intensity(1, 0, 0), 1);
        assert_eq!(intensity(1, 1, 1), 3);
        assert_eq!(intensity(2, 0, 0), 4);
        assert_eq!(intensity(3, 4, 0), 25);
        assert_eq!(intensity(255, 255, 255), MAX_INTENSITY);
    }

    #[test]
    fn exhaustive_single_channel() {
        for value in 0..=255u32 {
            assert_eq!(intensity(value as u8, 0, 0), value * value);
            assert_eq!(intensity(0, value as u8, 0), value * value);
            assert_eq!(intensity(0, 0, value as u8), value * value);
        }
    }

    #[test]
    fn monotonic_in_each_channel() {
        for value in 0..255u8 {
            assert!(intensity(value + 1, 7, 13) > intensity(value, 7, 13));
            assert!(intensity(7, value + 1, 13) > intensity(7, value, 13));
            assert!(intensity(7, 13, value + 1) > intensity(7, 13, value));
        }
    }

    #[test]
    fn slice_form_agrees() {
        assert_eq!(intensity_of(&[10, 20, 30]), intensity(10, 20, 30));
        assert_eq!(intensity_of(&[255, 255, 255]), MAX_INTENSITY);
    }
}

//! Turning a finished accumulation buffer into an encodable image.
//!
//! The buffer leaves the [`TrailAccumulator`] exactly once, by value; the
//! resulting [`DynamicImage`] is 8-bit-per-channel RGB with no alpha, the
//! same shape as the video's frames, and can be handed straight to
//! [`DynamicImage::save`]. No resampling, no colour-space conversion.

use image::{DynamicImage, RgbImage};

use crate::{accumulator::TrailAccumulator, error::TrailError};

/// Consume the accumulator and produce the light-trail image.
///
/// A buffer that never saw a frame materializes as an all-black image.
///
/// # Errors
///
/// Returns [`TrailError::FrameRead`] if the buffer cannot be reassembled
/// into an image (a length/dimensions disagreement, which the accumulator's
/// own invariants rule out in practice).
///
/// # Example
///
/// ```
/// use lighttrail::{TrailAccumulator, materialize};
///
/// let accumulator = TrailAccumulator::new(4, 4)?;
/// let image = materialize(accumulator)?;
/// assert_eq!(image.width(), 4);
/// # Ok::<(), lighttrail::TrailError>(())
/// ```
pub fn materialize(accumulator: TrailAccumulator) -> Result<DynamicImage, TrailError> {
    let (width, height, data) = accumulator.into_raw();
    let rgb_image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
        TrailError::FrameRead(
            "failed to construct RGB image from the accumulation buffer".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}

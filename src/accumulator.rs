//! The running-maximum frame accumulator.
//!
//! [`TrailAccumulator`] owns the light-trail buffer under construction: a
//! tightly-packed RGB24 grid, one colour per pixel position, initialised to
//! black. Each ingested frame can only brighten a position — a pixel is
//! replaced when the incoming colour has strictly greater [`intensity`]
//! than the colour currently held, so equal-intensity ties keep the
//! earliest-seen colour.
//!
//! The buffer is never exposed for external mutation; it leaves the
//! accumulator exactly once, by value, via [`crate::materialize`].

use image::RgbImage;

use crate::{
    error::TrailError,
    intensity::{intensity, intensity_of},
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-pixel running-maximum accumulation buffer.
///
/// Feeding the same set of frames in any order yields a buffer with the same
/// per-pixel intensity; order only decides which colour survives among
/// equal-intensity ties. Ingesting a frame twice is a no-op the second time.
///
/// # Example
///
/// ```
/// use image::RgbImage;
/// use lighttrail::TrailAccumulator;
///
/// let mut accumulator = TrailAccumulator::new(2, 1)?;
/// let frame = RgbImage::from_raw(2, 1, vec![10, 0, 0, 0, 0, 0]).unwrap();
/// accumulator.ingest(&frame)?;
/// assert_eq!(accumulator.pixel(0, 0), [10, 0, 0]);
/// # Ok::<(), lighttrail::TrailError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrailAccumulator {
    width: u32,
    height: u32,
    /// Row-major RGB24 samples, `width * height * 3` bytes.
    data: Vec<u8>,
    frames_seen: u64,
}

impl TrailAccumulator {
    /// Allocate a zero-filled (all-black) buffer of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, TrailError> {
        if width == 0 || height == 0 {
            return Err(TrailError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 3],
            frames_seen: 0,
        })
    }

    /// Buffer dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of frames ingested so far.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Fold one decoded frame into the buffer.
    ///
    /// For every pixel position, the frame's colour replaces the stored
    /// colour only when its intensity is strictly greater. The frame itself
    /// is not modified, and a rejected frame leaves the buffer untouched.
    ///
    /// With the `rayon` feature enabled the per-pixel scan runs in parallel.
    /// Each update depends only on that pixel's own history, so the result
    /// is identical to the sequential scan.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::DimensionMismatch`] if the frame's dimensions
    /// differ from the buffer's.
    pub fn ingest(&mut self, frame: &RgbImage) -> Result<(), TrailError> {
        let (frame_width, frame_height) = frame.dimensions();
        if frame_width != self.width || frame_height != self.height {
            return Err(TrailError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: frame_width,
                actual_height: frame_height,
            });
        }

        let incoming = frame.as_raw();

        #[cfg(feature = "rayon")]
        self.data
            .par_chunks_exact_mut(3)
            .zip(incoming.par_chunks_exact(3))
            .for_each(|(current, candidate)| {
                if intensity_of(candidate) > intensity_of(current) {
                    current.copy_from_slice(candidate);
                }
            });

        #[cfg(not(feature = "rayon"))]
        for (current, candidate) in self
            .data
            .chunks_exact_mut(3)
            .zip(incoming.chunks_exact(3))
        {
            if intensity_of(candidate) > intensity_of(current) {
                current.copy_from_slice(candidate);
            }
        }

        self.frames_seen += 1;
        Ok(())
    }

    /// The colour currently held at `(x, y)` as `[r, g, b]`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    /// Intensity of the colour currently held at `(x, y)`.
    pub fn pixel_intensity(&self, x: u32, y: u32) -> u32 {
        let [r, g, b] = self.pixel(x, y);
        intensity(r, g, b)
    }

    /// Immutable view of the raw RGB24 samples, row-major.
    ///
    /// Valid after any number of ingests, including zero (all zeroes).
    pub fn snapshot(&self) -> &[u8] {
        &self.data
    }

    /// Hand the buffer over for materialization.
    pub(crate) fn into_raw(self) -> (u32, u32, Vec<u8>) {
        (self.width, self.height, self.data)
    }
}

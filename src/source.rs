//! The frame-source capability seam.
//!
//! Accumulation does not care where frames come from: a file, a live capture,
//! or an in-memory test fixture. [`FrameSource`] is the narrow interface the
//! converter drives — a source knows its dimensions and yields decoded RGB
//! frames until it runs dry.
//!
//! [`FrameReader`](crate::FrameReader) is the FFmpeg-backed implementation;
//! tests implement the trait over plain `Vec`s of frames.

use image::RgbImage;

use crate::error::TrailError;

/// A finite, non-restartable sequence of decoded frames.
///
/// `next_frame` returning `Ok(None)` signals end-of-stream, which is the
/// normal termination condition — never an error. Frames are yielded in
/// stream order; a fresh traversal requires constructing a fresh source.
pub trait FrameSource {
    /// Frame dimensions as `(width, height)`. Fixed for the source's
    /// lifetime.
    fn dimensions(&self) -> (u32, u32);

    /// Decode and return the next frame, or `Ok(None)` at end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::FrameRead`] when a frame exists but cannot be
    /// decoded.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrailError>;
}

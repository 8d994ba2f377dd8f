//! Error types for the `lighttrail` crate.
//!
//! This module defines [`TrailError`], the unified error type returned by all
//! fallible operations. Every error is terminal for the conversion job it
//! occurred in — nothing is retried internally.

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `lighttrail` operations.
///
/// Each failed conversion surfaces exactly one variant: the first error
/// encountered along the pipeline. Variants carry enough context to diagnose
/// the problem without additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrailError {
    /// An accumulation buffer was requested with a zero dimension.
    #[error("Invalid trail dimensions: {width}x{height} (both must be non-zero)")]
    InvalidDimensions {
        /// Requested buffer width in pixels.
        width: u32,
        /// Requested buffer height in pixels.
        height: u32,
    },

    /// An ingested frame's dimensions disagree with the accumulation buffer.
    #[error(
        "Frame dimensions {actual_width}x{actual_height} do not match the \
         trail buffer ({expected_width}x{expected_height})"
    )]
    DimensionMismatch {
        /// Width the buffer was initialised with.
        expected_width: u32,
        /// Height the buffer was initialised with.
        expected_height: u32,
        /// Width of the rejected frame.
        actual_width: u32,
        /// Height of the rejected frame.
        actual_height: u32,
    },

    /// The video source could not be opened, or its dimensions could not be
    /// read.
    #[error("Failed to open video source at {path}: {reason}")]
    SourceOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The source could not be positioned at the requested start frame.
    #[error("Failed to seek to frame {frame_number}: {reason}")]
    Seek {
        /// The frame number that was requested.
        frame_number: u64,
        /// Underlying reason the seek failed.
        reason: String,
    },

    /// A frame could not be read or decoded (not plain end-of-stream).
    #[error("Failed to read video frame: {0}")]
    FrameRead(String),

    /// The output image could not be written.
    #[error("Failed to encode trail image to {path}: {reason}")]
    Encode {
        /// Destination path of the failed write. A failure here may leave a
        /// partial file behind; callers should clean up the path.
        path: PathBuf,
        /// Underlying reason the encode failed.
        reason: String,
    },
}

impl From<FfmpegError> for TrailError {
    fn from(error: FfmpegError) -> Self {
        TrailError::FrameRead(error.to_string())
    }
}

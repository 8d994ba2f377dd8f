//! Video metadata types.
//!
//! Metadata is extracted once when a [`VideoFile`](crate::VideoFile) is
//! opened and cached for its lifetime.

use std::time::Duration;

/// Metadata for the video stream of an opened file.
///
/// # Example
///
/// ```no_run
/// use lighttrail::VideoFile;
///
/// let video = VideoFile::open("input.mp4")?;
/// let metadata = video.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// # Ok::<(), lighttrail::TrailError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate
    /// content).
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame
    /// rate. Zero when the container reports no usable duration.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
    /// Total duration of the media file.
    pub duration: Duration,
    /// Container format name (e.g. `"mp4"`, `"matroska"`).
    pub format: String,
}

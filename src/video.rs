//! Opening video files.
//!
//! [`VideoFile`] wraps an FFmpeg demuxer context: it opens the file, locates
//! the best video stream, and caches [`VideoMetadata`]. Frames are pulled
//! through a [`FrameReader`](crate::FrameReader) obtained from
//! [`VideoFile::reader`]; each reader is a single, non-restartable pass.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    error::TrailError, metadata::VideoMetadata, range::FrameRange, reader::FrameReader,
};

/// An opened video source.
///
/// The underlying demuxer handle is released when the `VideoFile` is dropped,
/// on both success and failure paths.
///
/// # Example
///
/// ```no_run
/// use lighttrail::{FrameRange, VideoFile};
///
/// let mut video = VideoFile::open("input.mp4")?;
/// println!("{}x{}", video.metadata().width, video.metadata().height);
///
/// let reader = video.reader(FrameRange::full())?;
/// for result in reader {
///     let (frame_number, _frame) = result?;
///     println!("decoded frame {frame_number}");
/// }
/// # Ok::<(), lighttrail::TrailError>(())
/// ```
pub struct VideoFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: VideoMetadata,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Path to the opened file (kept for error messages).
    pub(crate) file_path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for frame accumulation.
    ///
    /// Initialises FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::SourceOpen`] if the file cannot be opened, has
    /// no video stream, or reports unusable dimensions.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TrailError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video source: {}", file_path.display());

        // Safe to call multiple times.
        ffmpeg_next::init().map_err(|error| TrailError::SourceOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| TrailError::SourceOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or_else(|| TrailError::SourceOpen {
                path: file_path.clone(),
                reason: "no video stream found".to_string(),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input_context.format().name().to_string();

        let stream = input_context
            .stream(video_stream_index)
            .ok_or_else(|| TrailError::SourceOpen {
                path: file_path.clone(),
                reason: "video stream disappeared during open".to_string(),
            })?;

        let codec_parameters = stream.parameters();
        let decoder_context =
            CodecContext::from_parameters(codec_parameters).map_err(|error| {
                TrailError::SourceOpen {
                    path: file_path.clone(),
                    reason: format!("failed to read video codec parameters: {error}"),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| TrailError::SourceOpen {
                    path: file_path.clone(),
                    reason: format!("failed to create video decoder: {error}"),
                })?;

        let width = video_decoder.width();
        let height = video_decoder.height();
        if width == 0 || height == 0 {
            return Err(TrailError::SourceOpen {
                path: file_path,
                reason: format!("stream reports unusable dimensions {width}x{height}"),
            });
        }

        // Frames per second from the stream's average frame rate, with the
        // raw rate field as fallback.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let frame_count = if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
            duration,
            format,
        };

        log::debug!(
            "Opened {}: {}x{} @ {:.2} fps, ~{} frames [{}]",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            file_path,
        })
    }

    /// Cached metadata for the opened video stream.
    ///
    /// Extracted once during [`open`](VideoFile::open); no additional
    /// decoding.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Begin a single decoding pass over the frames selected by `range`.
    ///
    /// The reader borrows this `VideoFile` mutably; a fresh pass requires a
    /// fresh reader (and, for deterministic positioning, a freshly opened
    /// file).
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::Seek`] if the stream cannot be positioned at a
    /// start frame that lies within it, or [`TrailError::FrameRead`] if
    /// decoder construction fails.
    pub fn reader(&mut self, range: FrameRange) -> Result<FrameReader<'_>, TrailError> {
        FrameReader::new(self, range)
    }
}

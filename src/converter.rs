//! The conversion pipeline.
//!
//! [`TrailConverter`] sequences one job end to end: open the source, select
//! the frame range, fold every selected frame into a [`TrailAccumulator`],
//! materialize the buffer, and encode the still image. Each step either
//! completes or fails the whole job — nothing is retried, and exactly one
//! [`TrailError`] kind is surfaced per failed job.
//!
//! The demuxer handle is released (dropped) when accumulation ends, on both
//! the success and failure paths, before any encoding happens. No output
//! file is created until the encoding step; a failure *during* encoding may
//! leave a partial file at the destination.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    accumulator::TrailAccumulator,
    error::TrailError,
    materialize::materialize,
    metadata::VideoMetadata,
    progress::{ProgressCallback, ProgressInfo},
    range::FrameRange,
    source::FrameSource,
    video::VideoFile,
};

/// Where a conversion job currently stands.
///
/// Inspectable via [`TrailConverter::state`]; `Succeeded` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// Created, not yet run.
    Idle,
    /// Opening the video source and reading its dimensions.
    OpeningSource,
    /// Driving frames through the accumulator.
    Accumulating,
    /// Converting the finished buffer into an encodable image.
    Materializing,
    /// Writing the output image.
    Encoding,
    /// The trail image was written.
    Succeeded,
    /// The job stopped at the first error.
    Failed,
}

/// Summary of a completed conversion.
#[derive(Debug, Clone)]
#[must_use]
pub struct ConversionReport {
    /// Trail image width in pixels.
    pub width: u32,
    /// Trail image height in pixels.
    pub height: u32,
    /// Frames folded into the trail.
    pub frames_scanned: u64,
    /// Where the trail image was written.
    pub output: PathBuf,
    /// Wall-clock duration of the whole job.
    pub elapsed: Duration,
}

/// A single video → light-trail conversion job.
///
/// One converter owns one job: its input and output paths, the selected
/// [`FrameRange`], and — while running — the accumulation buffer. There is
/// no cross-job shared state; abandoning a job is just dropping the
/// converter.
///
/// # Example
///
/// ```no_run
/// use lighttrail::{FrameRange, TrailConverter};
///
/// let report = TrailConverter::new("fireworks.mp4", "fireworks_trail.png")
///     .with_range(FrameRange::new(0, 500))
///     .run()?;
/// println!("{} frames -> {}", report.frames_scanned, report.output.display());
/// # Ok::<(), lighttrail::TrailError>(())
/// ```
pub struct TrailConverter {
    input: PathBuf,
    output: PathBuf,
    range: FrameRange,
    progress: Option<Arc<dyn ProgressCallback>>,
    state: ConversionState,
}

impl TrailConverter {
    /// Create a job converting `input` into a trail image at `output`.
    ///
    /// The output format is inferred from the destination extension by the
    /// `image` crate. The default range is [`FrameRange::full`].
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            range: FrameRange::full(),
            progress: None,
            state: ConversionState::Idle,
        }
    }

    /// Restrict accumulation to the given frame range.
    #[must_use]
    pub fn with_range(mut self, range: FrameRange) -> Self {
        self.range = range;
        self
    }

    /// Receive a progress callback after every ingested frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The job's current state.
    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// Run the job to completion.
    ///
    /// # Errors
    ///
    /// The first error encountered, as one of the [`TrailError`] kinds.
    /// `run` consumes the job either way; a failed conversion is not
    /// restartable.
    pub fn run(mut self) -> Result<ConversionReport, TrailError> {
        self.state = ConversionState::OpeningSource;
        match self.execute() {
            Ok(report) => {
                self.state = ConversionState::Succeeded;
                Ok(report)
            }
            Err(error) => {
                self.state = ConversionState::Failed;
                log::debug!("Conversion of {} failed: {error}", self.input.display());
                Err(error)
            }
        }
    }

    fn execute(&mut self) -> Result<ConversionReport, TrailError> {
        let started = Instant::now();

        let mut video = VideoFile::open(&self.input)?;
        let metadata = video.metadata().clone();
        let mut accumulator = TrailAccumulator::new(metadata.width, metadata.height)?;

        self.state = ConversionState::Accumulating;
        let total_frames = estimate_selected_frames(&metadata, &self.range);
        {
            let reader = video.reader(self.range)?;
            for item in reader {
                let (_, frame) = item?;
                accumulator.ingest(&frame)?;

                if let Some(callback) = &self.progress {
                    let frames_scanned = accumulator.frames_seen();
                    let percentage = progress_percentage(frames_scanned, total_frames);
                    callback.on_progress(&ProgressInfo {
                        frames_scanned,
                        total_frames,
                        percentage,
                        elapsed: started.elapsed(),
                    });
                }
            }
        }
        // Release the demuxer handle before touching the filesystem again.
        drop(video);

        self.state = ConversionState::Materializing;
        let frames_scanned = accumulator.frames_seen();
        let (width, height) = accumulator.dimensions();
        let image = materialize(accumulator)?;

        self.state = ConversionState::Encoding;
        log::info!(
            "Encoding {}x{} trail from {} frame(s) to {}",
            width,
            height,
            frames_scanned,
            self.output.display(),
        );
        image.save(&self.output).map_err(|error| TrailError::Encode {
            path: self.output.clone(),
            reason: error.to_string(),
        })?;

        Ok(ConversionReport {
            width,
            height,
            frames_scanned,
            output: self.output.clone(),
            elapsed: started.elapsed(),
        })
    }
}

/// Fold every frame a source yields into a fresh accumulator.
///
/// This is the conversion core with the collaborators stripped away: it
/// works identically for an FFmpeg-backed [`FrameReader`](crate::FrameReader)
/// and for an in-memory fixture. A source that yields no frames produces an
/// all-black buffer, which is not an error.
///
/// # Errors
///
/// Propagates the first error from the source or the accumulator.
pub fn accumulate<S: FrameSource + ?Sized>(source: &mut S) -> Result<TrailAccumulator, TrailError> {
    let (width, height) = source.dimensions();
    let mut accumulator = TrailAccumulator::new(width, height)?;
    while let Some(frame) = source.next_frame()? {
        accumulator.ingest(&frame)?;
    }
    Ok(accumulator)
}

/// Estimate how many frames the range will select, when the container
/// reports a usable frame count.
fn estimate_selected_frames(metadata: &VideoMetadata, range: &FrameRange) -> Option<u64> {
    if metadata.frame_count == 0 || range.is_empty() {
        return None;
    }
    let first = range.first_frame();
    let last = range.last_frame().min(metadata.frame_count.saturating_sub(1));
    if last < first {
        return Some(0);
    }
    Some(last - first + 1)
}

/// Progress through the selected span, capped at 100%.
///
/// The frame count estimate is duration-derived and can undercount the
/// stream, so a raw ratio may overshoot once more frames than estimated
/// have been decoded.
fn progress_percentage(frames_scanned: u64, total_frames: Option<u64>) -> Option<f32> {
    total_frames
        .filter(|&total| total > 0)
        .map(|total| ((frames_scanned as f32 / total as f32) * 100.0).min(100.0))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::RgbImage;

    use super::{
        ConversionState, TrailConverter, accumulate, estimate_selected_frames, progress_percentage,
    };
    use crate::{
        error::TrailError, metadata::VideoMetadata, range::FrameRange, source::FrameSource,
    };

    /// A canned frame sequence standing in for a decoded video.
    struct MemorySource {
        width: u32,
        height: u32,
        frames: std::vec::IntoIter<RgbImage>,
    }

    impl MemorySource {
        fn new(width: u32, height: u32, frames: Vec<RgbImage>) -> Self {
            Self {
                width,
                height,
                frames: frames.into_iter(),
            }
        }
    }

    impl FrameSource for MemorySource {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn next_frame(&mut self) -> Result<Option<RgbImage>, TrailError> {
            Ok(self.frames.next())
        }
    }

    fn frame(width: u32, height: u32, samples: &[u8]) -> RgbImage {
        RgbImage::from_raw(width, height, samples.to_vec()).expect("bad test frame")
    }

    #[test]
    fn empty_source_accumulates_to_black() {
        let mut source = MemorySource::new(2, 2, Vec::new());
        let accumulator = accumulate(&mut source).unwrap();
        assert_eq!(accumulator.frames_seen(), 0);
        assert!(accumulator.snapshot().iter().all(|&sample| sample == 0));
    }

    #[test]
    fn accumulates_the_per_pixel_maximum() {
        let mut source = MemorySource::new(
            2,
            1,
            vec![
                frame(2, 1, &[10, 0, 0, 0, 0, 0]),
                frame(2, 1, &[0, 0, 0, 5, 5, 5]),
            ],
        );
        let accumulator = accumulate(&mut source).unwrap();
        assert_eq!(accumulator.pixel(0, 0), [10, 0, 0]);
        assert_eq!(accumulator.pixel(1, 0), [5, 5, 5]);
    }

    #[test]
    fn zero_dimension_source_is_rejected() {
        let mut source = MemorySource::new(0, 4, Vec::new());
        assert!(matches!(
            accumulate(&mut source),
            Err(TrailError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn converter_starts_idle() {
        let converter = TrailConverter::new("in.mp4", "out.png");
        assert_eq!(converter.state(), ConversionState::Idle);
    }

    fn metadata(frame_count: u64) -> VideoMetadata {
        VideoMetadata {
            width: 64,
            height: 64,
            frames_per_second: 25.0,
            frame_count,
            codec: "h264".to_string(),
            duration: Duration::from_secs(4),
            format: "mp4".to_string(),
        }
    }

    #[test]
    fn selected_frame_estimates() {
        // Full range over 100 frames: frames 1..=99 are selected.
        assert_eq!(
            estimate_selected_frames(&metadata(100), &FrameRange::full()),
            Some(99),
        );
        // Start past end-of-stream selects nothing.
        assert_eq!(
            estimate_selected_frames(&metadata(100), &FrameRange::new(500, 600)),
            Some(0),
        );
        // Unknown frame count: no estimate.
        assert_eq!(
            estimate_selected_frames(&metadata(0), &FrameRange::full()),
            None,
        );
        // Degenerate range: no estimate.
        assert_eq!(
            estimate_selected_frames(&metadata(100), &FrameRange::new(10, 5)),
            None,
        );
    }

    #[test]
    fn percentage_is_capped_when_the_estimate_undercounts() {
        assert_eq!(progress_percentage(50, Some(100)), Some(50.0));
        assert_eq!(progress_percentage(100, Some(100)), Some(100.0));
        // Duration-derived estimates can fall short of the real stream.
        assert_eq!(progress_percentage(130, Some(100)), Some(100.0));
        assert_eq!(progress_percentage(10, None), None);
        assert_eq!(progress_percentage(10, Some(0)), None);
    }
}

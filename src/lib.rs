//! # lighttrail
//!
//! Condense a video into a single long-exposure style "light trail"
//! photograph: every pixel of the output holds the brightest colour observed
//! at that position across the video's frames. Moving light sources — car
//! headlights, fireworks, sparklers — leave continuous streaks, exactly as
//! they would on film during a long exposure.
//!
//! Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; the output
//! image is encoded by [`image`], with the format inferred from the
//! destination extension.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lighttrail::TrailConverter;
//!
//! let report = TrailConverter::new("fireworks.mp4", "fireworks_trail.png").run()?;
//! println!("{} frames folded into {}", report.frames_scanned, report.output.display());
//! # Ok::<(), lighttrail::TrailError>(())
//! ```
//!
//! ### Restrict the frame range
//!
//! ```no_run
//! use lighttrail::{FrameRange, TrailConverter};
//!
//! // Only the first ~10 seconds of a 25 fps clip.
//! TrailConverter::new("input.mp4", "trail.png")
//!     .with_range(FrameRange::new(0, 250))
//!     .run()?;
//! # Ok::<(), lighttrail::TrailError>(())
//! ```
//!
//! ### Drive the accumulator yourself
//!
//! The accumulation core has no opinion about where frames come from — any
//! [`FrameSource`] will do, including in-memory fixtures:
//!
//! ```no_run
//! use lighttrail::{FrameRange, VideoFile, accumulate, materialize};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let mut reader = video.reader(FrameRange::full())?;
//! let trail = accumulate(&mut reader)?;
//! drop(reader);
//! materialize(trail)?.save("trail.png").unwrap();
//! # Ok::<(), lighttrail::TrailError>(())
//! ```
//!
//! ## Semantics worth knowing
//!
//! - A pixel is replaced only on a **strictly** brighter candidate
//!   (`r² + g² + b²`), so equal-intensity ties keep the earliest-seen
//!   colour.
//! - [`FrameRange`] emits frames starting at `start + 1`: the frame at the
//!   start index itself is skipped. This convention is historical and
//!   load-bearing; see [`range`] for details.
//! - A range lying entirely past end-of-stream is not an error; it produces
//!   an all-black image.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Parallelise the per-pixel scan inside each ingest |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod accumulator;
pub mod converter;
pub mod error;
pub mod ffmpeg;
pub mod intensity;
pub mod materialize;
pub mod metadata;
pub mod progress;
pub mod range;
pub mod reader;
pub mod source;
mod utilities;
pub mod video;

pub use accumulator::TrailAccumulator;
pub use converter::{ConversionReport, ConversionState, TrailConverter, accumulate};
pub use error::TrailError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use intensity::{MAX_INTENSITY, intensity};
pub use materialize::materialize;
pub use metadata::VideoMetadata;
pub use progress::{ProgressCallback, ProgressInfo};
pub use range::FrameRange;
pub use reader::FrameReader;
pub use source::FrameSource;
pub use video::VideoFile;

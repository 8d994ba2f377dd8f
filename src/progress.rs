//! Progress reporting.
//!
//! [`ProgressCallback`] lets callers watch a conversion frame by frame —
//! typically to drive a progress bar. The converter invokes the callback
//! after every ingested frame; implementations should return quickly.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lighttrail::{ProgressCallback, ProgressInfo, TrailConverter};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(percentage) = info.percentage {
//!             eprintln!("{percentage:.1}% ({} frames)", info.frames_scanned);
//!         }
//!     }
//! }
//!
//! let report = TrailConverter::new("input.mp4", "trail.png")
//!     .with_progress(Arc::new(PrintProgress))
//!     .run()?;
//! # Ok::<(), lighttrail::TrailError>(())
//! ```

use std::time::Duration;

/// A snapshot of conversion progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames ingested into the accumulator so far.
    pub frames_scanned: u64,
    /// Estimated total frames the selected range will produce, if the
    /// container reports enough to estimate one.
    pub total_frames: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total_frames` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the conversion started.
    pub elapsed: Duration,
}

/// Trait for receiving per-frame progress updates during a conversion.
///
/// Implementations must be [`Send`] and [`Sync`]; the callback is shared
/// behind an [`Arc`](std::sync::Arc) and may outlive the call site.
pub trait ProgressCallback: Send + Sync {
    /// Called after each frame is folded into the trail.
    fn on_progress(&self, info: &ProgressInfo);
}

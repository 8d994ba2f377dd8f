//! FFmpeg log level configuration.
//!
//! FFmpeg has its own logging system, separate from the Rust
//! [`log`](https://crates.io/crates/log) crate, and by default prints
//! warnings and errors to stderr — noisy when all you want is one output
//! image. This module wraps FFmpeg's log-level API so callers can tune that
//! output without importing `ffmpeg-next` directly. Rust-side diagnostics
//! still go through `log` and whatever subscriber the caller installs.

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity level.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants; setting a level
/// suppresses everything below that severity. Ordering, most verbose to
/// most quiet: `Trace` > `Debug` > `Verbose` > `Info` > `Warning` >
/// `Error` > `Fatal` > `Panic` > `Quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only unrecoverable conditions that abort the process.
    Panic,
    /// Only unrecoverable errors (the context becomes unusable).
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl From<FfmpegLogLevel> for Level {
    fn from(level: FfmpegLogLevel) -> Self {
        match level {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl From<Level> for FfmpegLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// # Example
///
/// ```no_run
/// use lighttrail::FfmpegLogLevel;
///
/// // Only show FFmpeg errors and above.
/// lighttrail::set_ffmpeg_log_level(FfmpegLogLevel::Error);
/// ```
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into());
}

/// Get the current FFmpeg internal log verbosity level, if it maps to a
/// known variant.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from)
}

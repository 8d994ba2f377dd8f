use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lighttrail::{
    FfmpegLogLevel, FrameRange, ProgressCallback, ProgressInfo, TrailConverter, VideoFile,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  lighttrail convert fireworks.mp4\n  lighttrail convert traffic.mp4 --out trail.png --start 0:00:05 --end 0:00:35 --progress\n  lighttrail metadata input.mp4 --json\n  lighttrail completions zsh > _lighttrail";

#[derive(Debug, Parser)]
#[command(
    name = "lighttrail",
    version,
    about = "Condense a video into a single long-exposure style light-trail image",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting an existing output file.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a video into a light-trail image.
    #[command(
        about = "Convert a video into a light-trail image",
        after_help = "Examples:\n  lighttrail convert fireworks.mp4\n  lighttrail convert input.mp4 --out trail.jpg --start 100 --end 700 --progress\n\nBounds accept a frame number (700) or a timecode (0:00:28). The frame at\nthe start bound itself is skipped; accumulation begins one frame after it."
    )]
    Convert {
        /// Input video path.
        input: PathBuf,

        /// Output image path; format follows the extension (png, jpg, bmp,
        /// tiff). Defaults to `<input stem>_trail.png` next to the input.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Start bound: frame number or HH:MM:SS timecode (exclusive).
        #[arg(long)]
        start: Option<String>,

        /// End bound: frame number or HH:MM:SS timecode (inclusive). May
        /// exceed the video length.
        #[arg(long)]
        end: Option<String>,
    },

    /// Print metadata for a video file (alias: probe).
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        visible_alias = "info",
        after_help = "Examples:\n  lighttrail metadata input.mp4\n  lighttrail metadata input.mp4 --json"
    )]
    Metadata {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return Ok(Duration::from_secs_f64(seconds.max(0.0)));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("invalid time format: {trimmed}").into());
    }

    let (hours, minutes, seconds_str) = if parts.len() == 3 {
        (parts[0].parse::<u64>()?, parts[1].parse::<u64>()?, parts[2])
    } else {
        (0_u64, parts[0].parse::<u64>()?, parts[1])
    };

    let seconds = seconds_str.parse::<f64>()?;
    let total_seconds = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    Ok(Duration::from_secs_f64(total_seconds.max(0.0)))
}

fn timestamp_to_frame_number(timestamp: Duration, frames_per_second: f64) -> u64 {
    (timestamp.as_secs_f64() * frames_per_second) as u64
}

/// A `--start`/`--end` value: a bare frame number, or a timecode converted
/// through the video's frame rate.
fn parse_frame_bound(
    value: &str,
    frames_per_second: f64,
) -> Result<u64, Box<dyn std::error::Error>> {
    if value.contains(':') {
        let timestamp = parse_timecode(value)?;
        if frames_per_second <= 0.0 {
            return Err("video reports no frame rate; use a frame number instead".into());
        }
        Ok(timestamp_to_frame_number(timestamp, frames_per_second))
    } else {
        Ok(value.parse::<u64>()?)
    }
}

/// Default output path: `<input stem>_trail.png` next to the input.
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    input.with_file_name(format!("{stem}_trail.png"))
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = env_logger::Builder::from_default_env();
    if global.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        lighttrail::set_ffmpeg_log_level(parsed);
    } else {
        // Keep FFmpeg's own chatter down unless explicitly requested.
        lighttrail::set_ffmpeg_log_level(FfmpegLogLevel::Error);
    }

    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::no_length();
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total_frames {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.frames_scanned);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Convert {
            input,
            out,
            start,
            end,
        } => {
            let output = out.unwrap_or_else(|| derive_output_path(&input));
            ensure_writable_path(&output, cli.global.overwrite)?;

            // Bounds may be timecodes; those need the frame rate up front.
            let range = match (&start, &end) {
                (None, None) => FrameRange::full(),
                _ => {
                    let video = VideoFile::open(&input)?;
                    let frames_per_second = video.metadata().frames_per_second;
                    drop(video);

                    let start_frame = match &start {
                        Some(value) => parse_frame_bound(value, frames_per_second)?,
                        None => 0,
                    };
                    let end_frame = match &end {
                        Some(value) => parse_frame_bound(value, frames_per_second)?,
                        None => u64::MAX,
                    };
                    FrameRange::new(start_frame, end_frame)
                }
            };

            let mut converter = TrailConverter::new(&input, &output).with_range(range);

            let progress = if cli.global.progress {
                let terminal = Arc::new(TerminalProgress::new()?);
                converter = converter.with_progress(terminal.clone());
                Some(terminal)
            } else {
                None
            };

            let report = converter.run()?;

            if let Some(terminal) = progress {
                terminal.finish();
            }

            if cli.global.verbose {
                eprintln!(
                    "scanned {} frame(s) in {:.2}s",
                    report.frames_scanned,
                    report.elapsed.as_secs_f64(),
                );
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{}x{} trail from {} frame(s) -> {}",
                    report.width,
                    report.height,
                    report.frames_scanned,
                    report.output.display()
                )
                .green()
            );
        }
        Commands::Metadata { input, json } => {
            let video = VideoFile::open(&input)?;
            let metadata = video.metadata();
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "width": metadata.width,
                    "height": metadata.height,
                    "fps": metadata.frames_per_second,
                    "frame_count": metadata.frame_count,
                    "codec": metadata.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps, ~{} frames [{}]",
                    metadata.width,
                    metadata.height,
                    metadata.frames_per_second,
                    metadata.frame_count,
                    metadata.codec,
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "lighttrail", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

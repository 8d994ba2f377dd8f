//! Accumulation semantics, end to end, without touching FFmpeg.
//!
//! These tests drive the public [`FrameSource`] seam with in-memory frame
//! sequences, which is exactly how the converter drives the FFmpeg-backed
//! reader. No fixture files required.

use image::RgbImage;
use lighttrail::{FrameSource, TrailError, accumulate, intensity, materialize};

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

/// A source that fails partway through, like a corrupt stream would.
struct FailingSource {
    yielded: bool,
}

impl FrameSource for FailingSource {
    fn dimensions(&self) -> (u32, u32) {
        (1, 1)
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrailError> {
        if self.yielded {
            Err(TrailError::FrameRead("simulated decode failure".to_string()))
        } else {
            self.yielded = true;
            Ok(Some(frame(1, 1, &[50, 50, 50])))
        }
    }
}

fn frame(width: u32, height: u32, samples: &[u8]) -> RgbImage {
    RgbImage::from_raw(width, height, samples.to_vec()).expect("bad test frame")
}

// ── accumulation behavior ──────────────────────────────────────────

#[test]
fn two_frames_light_different_pixels() {
    // 2x1 source: frame1 lights the left pixel, frame2 the right; the trail
    // keeps both.
    let mut source = MemorySource::new(
        2,
        1,
        vec![
            frame(2, 1, &[10, 0, 0, 0, 0, 0]),
            frame(2, 1, &[0, 0, 0, 5, 5, 5]),
        ],
    );

    let trail = accumulate(&mut source).unwrap();
    assert_eq!(trail.pixel(0, 0), [10, 0, 0]);
    assert_eq!(trail.pixel(1, 0), [5, 5, 5]);
}

#[test]
fn brightness_is_the_squared_norm_not_channel_count() {
    // intensity(1,1,1) = 3 < intensity(2,0,0) = 4, so (2,0,0) wins even
    // though (1,1,1) is lit in more channels.
    let mut source = MemorySource::new(
        1,
        1,
        vec![frame(1, 1, &[1, 1, 1]), frame(1, 1, &[2, 0, 0])],
    );

    let trail = accumulate(&mut source).unwrap();
    assert_eq!(trail.pixel(0, 0), [2, 0, 0]);
    assert!(intensity(2, 0, 0) > intensity(1, 1, 1));
}

#[test]
fn empty_source_yields_all_black_without_error() {
    // A frame range past end-of-stream degenerates to exactly this: a source
    // that yields nothing.
    let mut source = MemorySource::new(4, 3, Vec::new());
    let trail = accumulate(&mut source).unwrap();
    assert_eq!(trail.frames_seen(), 0);
    assert!(trail.snapshot().iter().all(|&sample| sample == 0));
}

// ── error propagation ──────────────────────────────────────────────

#[test]
fn source_failure_stops_accumulation() {
    let mut source = FailingSource { yielded: false };
    let result = accumulate(&mut source);
    assert!(matches!(result, Err(TrailError::FrameRead(_))));
}

#[test]
fn mismatched_frame_from_a_source_is_rejected() {
    // A source lying about its dimensions trips the accumulator's check.
    let mut source = MemorySource::new(2, 2, vec![frame(1, 1, &[9, 9, 9])]);
    let result = accumulate(&mut source);
    assert!(matches!(result, Err(TrailError::DimensionMismatch { .. })));
}

// ── materialize + encode ───────────────────────────────────────────

#[test]
fn untouched_trail_encodes_to_an_all_black_image() {
    let mut source = MemorySource::new(8, 8, Vec::new());
    let trail = accumulate(&mut source).unwrap();
    let image = materialize(trail).unwrap();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("black_trail.png");
    image.save(&path).expect("Failed to encode trail image");

    let decoded = image::open(&path).expect("Failed to re-open trail image");
    assert_eq!(decoded.width(), 8);
    assert_eq!(decoded.height(), 8);
    let rgb = decoded.to_rgb8();
    assert!(rgb.pixels().all(|pixel| pixel.0 == [0, 0, 0]));
}

#[test]
fn accumulated_trail_round_trips_through_png() {
    let mut source = MemorySource::new(
        2,
        2,
        vec![
            frame(2, 2, &[200, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            frame(2, 2, &[0, 0, 0, 0, 180, 0, 0, 0, 0, 1, 2, 3]),
        ],
    );
    let trail = accumulate(&mut source).unwrap();
    let image = materialize(trail).unwrap();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("trail.png");
    image.save(&path).expect("Failed to encode trail image");

    let decoded = image::open(&path).expect("Failed to re-open trail image").to_rgb8();
    assert_eq!(decoded.get_pixel(0, 0).0, [200, 0, 0]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 180, 0]);
    assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 0]);
    assert_eq!(decoded.get_pixel(1, 1).0, [1, 2, 3]);
}

//! Internal utility functions.
//!
//! Pixel-plane copying and pts/frame-number conversions shared between the
//! video reader and the converter.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB24
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3); this
/// strips it so the result can go straight into [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        // No padding — copy the whole plane at once.
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Rescale a PTS value to a 0-based frame number.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts_to_seconds(pts, time_base);
    (seconds * frames_per_second) as u64
}

/// Convert a frame number to a seek timestamp in AV_TIME_BASE (microseconds).
///
/// `input_context.seek()` (via `avformat_seek_file` with `stream_index = -1`)
/// expects timestamps in AV_TIME_BASE (1/1_000_000), not the stream time
/// base.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::Rational;

    use super::{frame_number_to_seek_timestamp, pts_to_frame_number, pts_to_seconds};

    #[test]
    fn pts_round_trips_through_seconds() {
        // 1/25 time base: pts 50 is exactly 2 seconds.
        let time_base = Rational::new(1, 25);
        assert_eq!(pts_to_seconds(50, time_base), 2.0);
        assert_eq!(pts_to_frame_number(50, time_base, 25.0), 50);
    }

    #[test]
    fn seek_timestamp_is_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(25, 25.0), 1_000_000);
        assert_eq!(frame_number_to_seek_timestamp(0, 30.0), 0);
    }
}

//! Lazy, pull-based frame decoding.
//!
//! [`FrameReader`] implements [`Iterator`] and decodes frames on demand —
//! each call to [`next()`](Iterator::next) reads just enough packets to
//! produce the next frame inside the selected [`FrameRange`]. Nothing is
//! buffered beyond the frame in flight, so accumulation over an hour of
//! video holds exactly one decoded frame at a time.
//!
//! Create a `FrameReader` via [`VideoFile::reader`](crate::VideoFile::reader).

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::error::EAGAIN,
};
use image::RgbImage;

use crate::{
    error::TrailError, range::FrameRange, source::FrameSource, utilities, video::VideoFile,
};

/// A single decoding pass over the frames selected by a [`FrameRange`].
///
/// Yields `(frame_number, frame)` pairs in stream order, converted to
/// tightly-packed RGB24 at the stream's native dimensions. The reader
/// borrows the underlying [`VideoFile`] mutably; dropping it releases the
/// borrow. It is finite and not restartable.
///
/// Frame numbers are derived from each frame's presentation timestamp when
/// the stream advertises a frame rate, and from decode order otherwise.
pub struct FrameReader<'a> {
    video: &'a mut VideoFile,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    range: FrameRange,
    time_base: Rational,
    frames_per_second: f64,
    width: u32,
    height: u32,
    /// Fallback position counter for streams without a usable frame rate.
    frames_decoded: u64,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl<'a> FrameReader<'a> {
    pub(crate) fn new(video: &'a mut VideoFile, range: FrameRange) -> Result<Self, TrailError> {
        let video_stream_index = video.video_stream_index;
        let frames_per_second = video.metadata.frames_per_second;
        let frame_count = video.metadata.frame_count;
        let width = video.metadata.width;
        let height = video.metadata.height;

        let stream = video
            .input_context
            .stream(video_stream_index)
            .ok_or_else(|| TrailError::FrameRead("video stream vanished".to_string()))?;
        let time_base = stream.time_base();
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let decoder = decoder_context.decoder().video()?;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        // Seek to the nearest keyframe before the first selected frame; the
        // pts filter in `next()` discards everything decoded before it. A
        // failed seek only matters when the start frame provably lies inside
        // the stream — seeking past end-of-stream is the normal way to get
        // an empty pass.
        let first = range.first_frame();
        if !range.is_empty() && frames_per_second > 0.0 && first > 0 {
            let seek_timestamp =
                utilities::frame_number_to_seek_timestamp(first, frames_per_second);
            if let Err(error) = video.input_context.seek(seek_timestamp, ..seek_timestamp) {
                if frame_count > 0 && first < frame_count {
                    return Err(TrailError::Seek {
                        frame_number: first,
                        reason: error.to_string(),
                    });
                }
                log::debug!(
                    "Seek to frame {first} past end-of-stream ignored ({error}); \
                     falling back to a full scan",
                );
            }
        }

        Ok(Self {
            done: range.is_empty(),
            video,
            decoder,
            scaler,
            video_stream_index,
            range,
            time_base,
            frames_per_second,
            width,
            height,
            frames_decoded: 0,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            eof_sent: false,
        })
    }

    /// Output dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of the frame currently sitting in `decoded_frame`.
    fn current_frame_number(&self) -> u64 {
        if self.frames_per_second > 0.0 {
            let pts = self.decoded_frame.pts().unwrap_or(0);
            utilities::pts_to_frame_number(pts, self.time_base, self.frames_per_second)
        } else {
            self.frames_decoded
        }
    }

    /// Scale and copy the current `decoded_frame` into an [`RgbImage`].
    fn convert_current_frame(&mut self) -> Result<RgbImage, TrailError> {
        self.scaler.run(&self.decoded_frame, &mut self.scaled_frame)?;
        let buffer = utilities::frame_to_rgb_buffer(&self.scaled_frame, self.width, self.height);
        RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            TrailError::FrameRead(
                "failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

/// Whether a packet read error means the demuxer may still deliver data.
///
/// Only `EAGAIN` qualifies; anything else that is not end-of-stream is
/// treated as fatal by the read loop.
fn is_transient_read_error(error: &FfmpegError) -> bool {
    matches!(error, FfmpegError::Other { errno: EAGAIN })
}

impl Iterator for FrameReader<'_> {
    type Item = Result<(u64, RgbImage), TrailError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Drain frames the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let frame_number = self.current_frame_number();
                self.frames_decoded += 1;

                if frame_number > self.range.last_frame() {
                    self.done = true;
                    return None;
                }

                if self.range.contains(frame_number) {
                    return match self.convert_current_frame() {
                        Ok(frame) => Some(Ok((frame_number, frame))),
                        Err(error) => {
                            self.done = true;
                            Some(Err(error))
                        }
                    };
                }

                // Before the selected span — keep draining.
                continue;
            }

            if self.eof_sent {
                // Decoder is flushed and dry.
                self.done = true;
                return None;
            }

            // Feed the decoder more packets.
            let mut packet = Packet::empty();
            match packet.read(&mut self.video.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            self.done = true;
                            return Some(Err(TrailError::FrameRead(error.to_string())));
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.done = true;
                        return Some(Err(TrailError::FrameRead(error.to_string())));
                    }
                    self.eof_sent = true;
                }
                Err(error) if is_transient_read_error(&error) => {
                    // The demuxer has no packet ready yet; ask again.
                }
                Err(error) => {
                    // A persistent demuxer failure (truncated container, I/O
                    // error) would otherwise retry forever without producing
                    // a packet.
                    self.done = true;
                    return Some(Err(TrailError::FrameRead(error.to_string())));
                }
            }
        }
    }
}

impl FrameSource for FrameReader<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrailError> {
        match self.next() {
            Some(Ok((_, frame))) => Ok(Some(frame)),
            Some(Err(error)) => Err(error),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::{Error as FfmpegError, util::error::EAGAIN};

    use super::is_transient_read_error;

    #[test]
    fn only_eagain_is_retried() {
        assert!(is_transient_read_error(&FfmpegError::Other {
            errno: EAGAIN
        }));
    }

    #[test]
    fn persistent_read_errors_are_fatal() {
        // A demuxer stuck on one of these never produces another packet, so
        // retrying would loop forever.
        assert!(!is_transient_read_error(&FfmpegError::InvalidData));
        assert!(!is_transient_read_error(&FfmpegError::Eof));
        assert!(!is_transient_read_error(&FfmpegError::Other {
            errno: EAGAIN + 1
        }));
    }
}

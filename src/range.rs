//! Frame range selection.
//!
//! [`FrameRange`] describes which frames of a video take part in the
//! accumulation: an inclusive `(start, end)` pair over the decoder's 0-based
//! frame numbering.
//!
//! One convention is preserved verbatim from the tool this crate grew out of
//! and is load-bearing for output compatibility: the first frame actually
//! emitted is `start + 1`, not `start`. In particular the default
//! whole-video range skips the very first decoded frame. Callers that want a
//! frame included must pass a `start` one below it.

/// Inclusive span of frame numbers considered for accumulation.
///
/// `end` may exceed the stream's actual length; decoding then simply stops at
/// end-of-stream, which is never an error. A range whose span lies entirely
/// past end-of-stream selects nothing and produces an all-black trail.
///
/// # Example
///
/// ```
/// use lighttrail::FrameRange;
///
/// let range = FrameRange::new(10, 20);
/// assert_eq!(range.first_frame(), 11); // start + 1, by convention
/// assert!(range.contains(20));
/// assert!(!range.contains(21));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FrameRange {
    start: u64,
    end: u64,
}

impl FrameRange {
    /// Range selecting frames `start + 1 ..= end`.
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Range covering the whole video (minus the skipped first frame).
    pub const fn full() -> Self {
        Self {
            start: 0,
            end: u64::MAX,
        }
    }

    /// The requested start bound, as given.
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// The requested end bound, as given.
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// First frame number the range emits: `start + 1`.
    pub const fn first_frame(&self) -> u64 {
        self.start.saturating_add(1)
    }

    /// Last frame number the range emits, stream length permitting.
    pub const fn last_frame(&self) -> u64 {
        self.end
    }

    /// Whether `frame_number` falls inside the emitted span.
    pub const fn contains(&self, frame_number: u64) -> bool {
        frame_number >= self.first_frame() && frame_number <= self.end
    }

    /// `true` when the range can never emit a frame, whatever the stream.
    pub const fn is_empty(&self) -> bool {
        self.end < self.first_frame()
    }
}

impl Default for FrameRange {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameRange;

    #[test]
    fn first_frame_skips_the_start_index() {
        let range = FrameRange::new(0, 100);
        assert_eq!(range.first_frame(), 1);
        assert!(!range.contains(0));
        assert!(range.contains(1));
        assert!(range.contains(100));
        assert!(!range.contains(101));
    }

    #[test]
    fn full_range_spans_to_max() {
        let range = FrameRange::full();
        assert_eq!(range.first_frame(), 1);
        assert_eq!(range.last_frame(), u64::MAX);
        assert!(range.contains(u64::MAX));
        assert!(!range.is_empty());
    }

    #[test]
    fn degenerate_ranges_are_empty() {
        // end below first emitted frame: nothing can ever match.
        assert!(FrameRange::new(10, 10).is_empty());
        assert!(FrameRange::new(10, 5).is_empty());
        assert!(!FrameRange::new(10, 11).is_empty());
    }

    #[test]
    fn saturates_at_the_top_of_the_index_space() {
        let range = FrameRange::new(u64::MAX, u64::MAX);
        assert_eq!(range.first_frame(), u64::MAX);
        assert!(range.contains(u64::MAX));
    }

    #[test]
    fn default_is_the_full_range() {
        assert_eq!(FrameRange::default(), FrameRange::full());
    }
}

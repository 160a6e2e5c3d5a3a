//! MPEG audio framing.
//!
//! Provides the frame-level view of an MP3 stream that the merge engine works
//! on: frame iteration, seek-header detection and synthesis, and leading tag
//! extraction. No audio is decoded.

pub mod header;
pub mod id3;
pub mod reader;
pub mod xing;

use std::io::Read;

use crate::error::Result;
use crate::types::{Frame, MergeStats, Tag};

// Re-export commonly used items
pub use header::{FrameHeader, Layer, MpegVersion};
pub use id3::read_leading_tag;
pub use reader::FrameReader;
pub use xing::{is_seek_header_frame, read_xing_totals, synthesize_xing_frame};

/// Read buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// A lazy, finite, non-restartable sequence of frames.
pub trait FrameSource {
    /// Returns the next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// The frame-level capabilities the merge engine needs from an audio format.
pub trait FrameFormat {
    type Frames<R: Read>: FrameSource;

    /// Starts iterating frames over `reader`.
    fn frames<R: Read>(&self, reader: R) -> Self::Frames<R>;

    /// Builds the combined seek-header frame for a merged stream.
    fn seek_header(&self, stats: &MergeStats) -> Result<Frame>;

    /// Reads the metadata tag at the start of `reader`, if there is one.
    fn leading_tag<R: Read>(&self, reader: R) -> Result<Option<Tag>>;
}

/// MP3 framing with Xing seek headers and ID3v2 tags.
#[derive(Debug, Clone, Copy)]
pub struct Mp3Format {
    buffer_size: usize,
}

impl Mp3Format {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for Mp3Format {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameFormat for Mp3Format {
    type Frames<R: Read> = FrameReader<R>;

    fn frames<R: Read>(&self, reader: R) -> FrameReader<R> {
        FrameReader::with_capacity(self.buffer_size, reader)
    }

    fn seek_header(&self, stats: &MergeStats) -> Result<Frame> {
        synthesize_xing_frame(stats.total_frames, stats.total_bytes, stats.first_frame_header)
    }

    fn leading_tag<R: Read>(&self, reader: R) -> Result<Option<Tag>> {
        read_leading_tag(reader)
    }
}

//! Pull-based MPEG audio frame reader.
//!
//! Walks a byte stream frame by frame, skipping ID3 tags and resynchronising
//! over bytes that do not start a frame.

use std::collections::VecDeque;
use std::io::{self, BufReader, Read};

use tracing::{debug, warn};

use super::header::{FrameHeader, HEADER_LEN};
use super::id3::{tag_len, ID3V1_LEN, ID3V2_HEADER_LEN};
use super::xing::is_seek_header_frame;
use super::{FrameSource, DEFAULT_BUFFER_SIZE};
use crate::error::{ErrorCode, MergeError, Result};
use crate::types::{Frame, FrameKind};

/// Reads MPEG audio frames from any byte stream.
///
/// The reader is finite and cannot be restarted: each call to
/// [`FrameSource::next_frame`] consumes bytes from the underlying stream.
pub struct FrameReader<R: Read> {
    inner: BufReader<R>,
    /// Bytes read ahead that must be scanned again before reading `inner`.
    pushback: VecDeque<u8>,
    frames_read: u64,
    bytes_skipped: u64,
    finished: bool,
}

impl<R: Read> FrameReader<R> {
    /// Wraps a stream with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    /// Wraps a stream with a buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, reader),
            pushback: VecDeque::new(),
            frames_read: 0,
            bytes_skipped: 0,
            finished: false,
        }
    }

    /// Frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Bytes discarded while searching for frame sync.
    pub fn bytes_skipped(&self) -> u64 {
        self.bytes_skipped
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut window = [0u8; HEADER_LEN];
        if !self.fill(&mut window)? {
            return Ok(None);
        }

        loop {
            if let Some(header) = FrameHeader::parse(window) {
                let len = header.frame_len();
                let mut raw_bytes = vec![0u8; len];
                raw_bytes[..HEADER_LEN].copy_from_slice(&window);
                if !self.fill(&mut raw_bytes[HEADER_LEN..])? {
                    debug!(len, "stream ends inside a frame, dropping it");
                    return Ok(None);
                }
                let kind = if is_seek_header_frame(&raw_bytes) {
                    FrameKind::SeekHeader
                } else {
                    FrameKind::Audio
                };
                return Ok(Some(Frame {
                    raw_bytes,
                    bit_rate_kbps: header.bit_rate_kbps,
                    kind,
                }));
            }

            if &window[..3] == b"TAG" {
                if !self.skip((ID3V1_LEN - HEADER_LEN) as u64)? || !self.fill(&mut window)? {
                    return Ok(None);
                }
                continue;
            }

            if &window[..3] == b"ID3" {
                let mut header = [0u8; ID3V2_HEADER_LEN];
                header[..HEADER_LEN].copy_from_slice(&window);
                if !self.fill(&mut header[HEADER_LEN..])? {
                    return Ok(None);
                }
                if let Some(len) = tag_len(&header) {
                    debug!(len, "skipping ID3v2 tag");
                    if !self.skip((len - ID3V2_HEADER_LEN) as u64)? || !self.fill(&mut window)? {
                        return Ok(None);
                    }
                    continue;
                }
                // Not a tag after all; rescan what was read ahead.
                for &byte in header[HEADER_LEN..].iter().rev() {
                    self.pushback.push_front(byte);
                }
            }

            self.bytes_skipped += 1;
            window.copy_within(1.., 0);
            if !self.fill(&mut window[HEADER_LEN - 1..])? {
                return Ok(None);
            }
        }
    }

    /// Fills `buf` completely; returns false on end of stream, even mid-buffer.
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        let from_pushback = buf.len().min(self.pushback.len());
        for (slot, byte) in buf.iter_mut().zip(self.pushback.drain(..from_pushback)) {
            *slot = byte;
        }
        match self.inner.read_exact(&mut buf[from_pushback..]) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(read_error(e)),
        }
    }

    /// Discards `count` bytes; returns false if the stream ended first.
    fn skip(&mut self, count: u64) -> Result<bool> {
        let from_pushback = (count as usize).min(self.pushback.len());
        self.pushback.drain(..from_pushback);
        let remaining = count - from_pushback as u64;
        let skipped = io::copy(&mut self.inner.by_ref().take(remaining), &mut io::sink())
            .map_err(read_error)?;
        Ok(skipped == remaining)
    }
}

impl<R: Read> FrameSource for FrameReader<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        match self.read_frame()? {
            Some(frame) => {
                self.frames_read += 1;
                Ok(Some(frame))
            }
            None => {
                self.finished = true;
                if self.frames_read == 0 && self.bytes_skipped > 0 {
                    return Err(MergeError::format(format!(
                        "no MPEG audio frames found in {} bytes of data",
                        self.bytes_skipped
                    )));
                }
                if self.bytes_skipped > 0 {
                    warn!(
                        bytes = self.bytes_skipped,
                        "skipped bytes that were not part of any frame"
                    );
                }
                Ok(None)
            }
        }
    }
}

fn read_error(e: io::Error) -> MergeError {
    MergeError::with_source(ErrorCode::Io, format!("failed to read input: {}", e), e)
}

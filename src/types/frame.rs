//! Frame and Tag records produced by a frame source.

/// Classification of a frame as produced by the frame source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Compressed audio.
    Audio,
    /// An existing Xing, Info, or VBRI header frame.
    SeekHeader,
}

/// A single MPEG audio frame, header included.
///
/// Frames are consumed one at a time by the orchestrator and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame exactly as it appeared in the stream.
    pub raw_bytes: Vec<u8>,
    /// Declared bitrate in kbps.
    pub bit_rate_kbps: u32,
    /// Audio or seek header.
    pub kind: FrameKind,
}

impl Frame {
    /// Returns the frame length in bytes.
    pub fn len(&self) -> usize {
        self.raw_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_bytes.is_empty()
    }

    pub fn is_seek_header(&self) -> bool {
        self.kind == FrameKind::SeekHeader
    }

    /// Returns the 4-byte frame header, if the frame is long enough to carry one.
    pub fn header_bytes(&self) -> Option<[u8; 4]> {
        self.raw_bytes
            .get(..4)
            .map(|b| [b[0], b[1], b[2], b[3]])
    }
}

/// A leading metadata tag (ID3v2), kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub raw_bytes: Vec<u8>,
}

impl Tag {
    pub fn len(&self) -> usize {
        self.raw_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_bytes.is_empty()
    }

    /// ID3v2 major version (3 for ID3v2.3, 4 for ID3v2.4).
    pub fn major_version(&self) -> Option<u8> {
        self.raw_bytes.get(3).copied()
    }
}

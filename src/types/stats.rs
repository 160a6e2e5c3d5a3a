//! Aggregate statistics gathered while merging.

use serde::{Deserialize, Serialize};

use super::frame::Frame;

/// Running totals over every frame written to the output.
///
/// Counts only ever increase, and `is_variable_bit_rate` never resets once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Frames written to the output.
    pub total_frames: u64,

    /// Bytes written to the output.
    pub total_bytes: u64,

    /// Bitrate of the first frame written, in kbps.
    pub baseline_bit_rate: Option<u32>,

    /// True once any frame's bitrate differs from the baseline.
    pub is_variable_bit_rate: bool,

    /// Input files fully consumed.
    pub input_files: usize,

    /// Leading seek-header frames dropped from inputs.
    pub skipped_seek_headers: usize,

    /// Header of the first frame written, used as the seek-header template.
    #[serde(skip)]
    pub first_frame_header: Option<[u8; 4]>,
}

impl MergeStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for a frame that was written to the output.
    pub fn record(&mut self, frame: &Frame) {
        self.total_frames += 1;
        self.total_bytes += frame.len() as u64;

        match self.baseline_bit_rate {
            None => {
                self.baseline_bit_rate = Some(frame.bit_rate_kbps);
                self.first_frame_header = frame.header_bytes();
            }
            Some(baseline) if baseline != frame.bit_rate_kbps => {
                self.is_variable_bit_rate = true;
            }
            Some(_) => {}
        }
    }

    /// Accounts for a leading seek header that was dropped.
    pub fn record_skipped_seek_header(&mut self) {
        self.skipped_seek_headers += 1;
    }

    /// Marks one more input file as fully consumed.
    pub fn finish_input(&mut self) {
        self.input_files += 1;
    }
}

/// Outcome of a complete merge job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub stats: MergeStats,
    /// True if a synthesized seek header was prepended.
    pub seek_header_added: bool,
    /// Length of the tag copied from the first input, if any.
    pub tag_bytes: Option<usize>,
}

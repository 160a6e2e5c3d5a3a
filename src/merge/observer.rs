//! Progress reporting for merge jobs.
//!
//! The pipeline reports through a [`MergeObserver`] handed in by the caller
//! rather than through global state, so library users choose where progress
//! goes and tests can record it.

use std::path::Path;

use tracing::{debug, info};

use crate::types::{MergeReport, MergeStats};

/// Receives progress events from a merge. All methods default to no-ops.
pub trait MergeObserver {
    /// An input is about to be read. `index` is its position in the job.
    fn input_started(&mut self, _index: usize, _path: &Path) {}

    /// An input was fully consumed, contributing `frames` frames.
    fn input_finished(&mut self, _index: usize, _path: &Path, _frames: u64) {}

    /// A combined seek header is about to be prepended.
    fn seek_header_added(&mut self, _stats: &MergeStats) {}

    /// A tag of `len` bytes is about to be prepended.
    fn tag_added(&mut self, _len: usize) {}

    /// The merge completed.
    fn finished(&mut self, _report: &MergeReport) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MergeObserver for TracingObserver {
    fn input_started(&mut self, index: usize, path: &Path) {
        debug!(index, path = %path.display(), "reading input");
    }

    fn input_finished(&mut self, index: usize, path: &Path, frames: u64) {
        debug!(index, path = %path.display(), frames, "input consumed");
    }

    fn seek_header_added(&mut self, stats: &MergeStats) {
        info!(
            frames = stats.total_frames,
            bytes = stats.total_bytes,
            "multiple bitrates detected, adding VBR header"
        );
    }

    fn tag_added(&mut self, len: usize) {
        info!(len, "adding ID3 tag");
    }

    fn finished(&mut self, report: &MergeReport) {
        info!(
            files = report.stats.input_files,
            frames = report.stats.total_frames,
            bytes = report.stats.total_bytes,
            vbr = report.stats.is_variable_bit_rate,
            "merge complete"
        );
    }
}

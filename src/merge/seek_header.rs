//! Adds a combined seek header to a variable-bitrate output.

use std::path::Path;

use super::observer::MergeObserver;
use super::rewrite::AtomicRewriter;
use crate::audio::FrameFormat;
use crate::error::Result;
use crate::types::MergeStats;

/// Prepends a seek header built from `stats` when the output is variable bitrate.
///
/// Returns true if a header was added. Must run before the tag is copied so the
/// tag ends up in front of the header.
pub fn add_seek_header<F: FrameFormat>(
    output: &Path,
    stats: &MergeStats,
    format: &F,
    rewriter: &AtomicRewriter,
    observer: &mut dyn MergeObserver,
) -> Result<bool> {
    if !stats.is_variable_bit_rate {
        return Ok(false);
    }

    let frame = format.seek_header(stats).map_err(|e| e.at_path(output))?;
    observer.seek_header_added(stats);
    rewriter.prepend(output, &frame.raw_bytes)?;
    Ok(true)
}

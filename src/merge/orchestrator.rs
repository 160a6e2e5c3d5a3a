//! Frame-by-frame concatenation of the job's inputs.
//!
//! Walks every input in order, drops each input's own leading seek header,
//! writes all other frames verbatim, and accumulates [`MergeStats`].

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::observer::MergeObserver;
use crate::audio::{FrameFormat, FrameSource};
use crate::config::MergeConfig;
use crate::error::{IoStage, MergeError, Result};
use crate::types::{Frame, FrameKind, MergeJob, MergeStats};

/// Returns true for a seek header left over from an individual input.
///
/// Each input may start with a seek header describing only itself. Only the
/// frame at index 0 of an input is treated this way; a combined header for the
/// whole output is added later if needed.
pub fn is_stale_seek_header(frame_index: u64, frame: &Frame) -> bool {
    frame_index == 0 && frame.kind == FrameKind::SeekHeader
}

/// Writes the concatenated frames of every input to the job's output.
///
/// The job is validated first; a validation failure leaves the filesystem
/// untouched. Any later failure aborts the merge and may leave a partial
/// output behind.
pub fn merge_frames<F: FrameFormat>(
    job: &MergeJob,
    format: &F,
    config: &MergeConfig,
    observer: &mut dyn MergeObserver,
) -> Result<MergeStats> {
    job.validate()?;

    let file = create_output(&job.output_path, job.overwrite)?;
    let mut out = BufWriter::with_capacity(config.copy_buffer_size, file);
    let mut stats = MergeStats::new();

    for (index, input) in job.input_paths.iter().enumerate() {
        observer.input_started(index, input);
        let frames = append_input(input, &job.output_path, format, &mut out, &mut stats)?;
        stats.finish_input();
        observer.input_finished(index, input, frames);
    }

    out.flush()
        .map_err(|e| MergeError::io(IoStage::WriteOutput, &job.output_path, e))?;
    Ok(stats)
}

/// Opens the output, refusing to replace an existing file unless allowed.
fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    let opened = if overwrite {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    };
    opened.map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => MergeError::output_exists(path),
        _ => MergeError::io(IoStage::CreateOutput, path, e),
    })
}

/// Appends one input's frames; returns the number of frames written.
fn append_input<F: FrameFormat, W: Write>(
    input: &Path,
    output: &Path,
    format: &F,
    out: &mut W,
    stats: &mut MergeStats,
) -> Result<u64> {
    let file = File::open(input).map_err(|e| MergeError::io(IoStage::OpenInput, input, e))?;
    let mut frames = format.frames(file);
    let mut frame_index = 0u64;
    let mut written = 0u64;

    while let Some(frame) = frames.next_frame().map_err(|e| e.at_path(input))? {
        let index = frame_index;
        frame_index += 1;

        if is_stale_seek_header(index, &frame) {
            debug!(input = %input.display(), "dropping input's own seek header");
            stats.record_skipped_seek_header();
            continue;
        }

        out.write_all(&frame.raw_bytes)
            .map_err(|e| MergeError::io(IoStage::WriteOutput, output, e))?;
        stats.record(&frame);
        written += 1;
    }

    if written == 0 {
        warn!(input = %input.display(), "input contains no audio frames");
    }
    Ok(written)
}

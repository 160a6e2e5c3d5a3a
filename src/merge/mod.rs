//! The merge engine.
//!
//! A merge runs three sequential stages against one output file:
//!
//! 1. [`merge_frames`] concatenates the inputs' frames and gathers statistics.
//! 2. [`add_seek_header`] prepends a combined seek header if bitrates differ.
//! 3. [`copy_leading_tag`] prepends the first input's tag if requested.
//!
//! The order of 2 and 3 fixes the output layout as `[tag][seek header][frames]`.

pub mod observer;
pub mod orchestrator;
pub mod rewrite;
pub mod seek_header;
pub mod tag;

use crate::audio::{FrameFormat, Mp3Format};
use crate::config::MergeConfig;
use crate::error::Result;
use crate::types::{MergeJob, MergeReport};

// Re-export commonly used items
pub use observer::{MergeObserver, NoopObserver, TracingObserver};
pub use orchestrator::{is_stale_seek_header, merge_frames};
pub use rewrite::AtomicRewriter;
pub use seek_header::add_seek_header;
pub use tag::copy_leading_tag;

/// Runs a complete merge job with the given frame format.
///
/// # Example
///
/// ```ignore
/// use mp3_merge::{merge, MergeConfig, MergeJob, Mp3Format, TracingObserver};
///
/// let job = MergeJob::new("output.mp3", ["0.mp3", "1.mp3"]).with_overwrite(true);
/// let report = merge(&job, &Mp3Format::new(), &MergeConfig::default(), &mut TracingObserver)?;
/// ```
pub fn merge<F: FrameFormat>(
    job: &MergeJob,
    format: &F,
    config: &MergeConfig,
    observer: &mut dyn MergeObserver,
) -> Result<MergeReport> {
    let stats = merge_frames(job, format, config, observer)?;
    let rewriter = AtomicRewriter::from_config(config);

    let seek_header_added = add_seek_header(&job.output_path, &stats, format, &rewriter, observer)?;

    let tag_bytes = match job.first_input() {
        Some(first) if job.include_tag => {
            copy_leading_tag(&job.output_path, first, format, &rewriter, observer)?
        }
        _ => None,
    };

    let report = MergeReport {
        stats,
        seek_header_added,
        tag_bytes,
    };
    observer.finished(&report);
    Ok(report)
}

/// Merges MP3 files, logging progress through `tracing`.
pub fn merge_mp3(job: &MergeJob, config: &MergeConfig) -> Result<MergeReport> {
    let format = Mp3Format::with_buffer_size(config.copy_buffer_size);
    merge(job, &format, config, &mut TracingObserver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{is_seek_header_frame, read_xing_totals, FrameReader, FrameSource};
    use crate::error::ErrorCode;
    use crate::test_fixtures::{audio_frames, id3v2_tag, write_mp3, xing_frame};
    use crate::types::FrameKind;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    /// Records every event, in order.
    #[derive(Default)]
    struct RecordingObserver {
        events: Vec<String>,
    }

    impl MergeObserver for RecordingObserver {
        fn input_started(&mut self, index: usize, _path: &Path) {
            self.events.push(format!("start {}", index));
        }

        fn input_finished(&mut self, index: usize, _path: &Path, frames: u64) {
            self.events.push(format!("done {} {}", index, frames));
        }

        fn seek_header_added(&mut self, _stats: &crate::types::MergeStats) {
            self.events.push("seek".to_string());
        }

        fn tag_added(&mut self, len: usize) {
            self.events.push(format!("tag {}", len));
        }

        fn finished(&mut self, report: &MergeReport) {
            self.events.push(format!("finished {}", report.stats.input_files));
        }
    }

    fn kinds(bytes: &[u8]) -> Vec<FrameKind> {
        let mut reader = FrameReader::new(bytes);
        let mut kinds = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            kinds.push(frame.kind);
        }
        kinds
    }

    fn run(job: &MergeJob) -> Result<MergeReport> {
        merge(job, &Mp3Format::new(), &MergeConfig::default(), &mut NoopObserver)
    }

    #[test]
    fn uniform_bitrate_inputs_merge_without_header() {
        let dir = tempdir().unwrap();
        let inputs: Vec<PathBuf> = [40, 30, 25]
            .iter()
            .enumerate()
            .map(|(i, &n)| write_mp3(dir.path(), &format!("{}.mp3", i), &[audio_frames(128, n)]))
            .collect();
        let output = dir.path().join("out.mp3");

        let report = run(&MergeJob::new(&output, &inputs)).unwrap();
        assert_eq!(report.stats.total_frames, 95);
        assert!(!report.stats.is_variable_bit_rate);
        assert!(!report.seek_header_added);
        assert!(report.tag_bytes.is_none());

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes, audio_frames(128, 95));
        assert!(!is_seek_header_frame(&bytes));
    }

    #[test]
    fn mixed_bitrates_get_combined_seek_header() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[xing_frame(b"Xing"), audio_frames(128, 50)]);
        let b = write_mp3(dir.path(), "1.mp3", &[xing_frame(b"Xing"), audio_frames(320, 50)]);
        let output = dir.path().join("out.mp3");

        let report = run(&MergeJob::new(&output, [&a, &b])).unwrap();
        assert!(report.stats.is_variable_bit_rate);
        assert!(report.seek_header_added);
        assert_eq!(report.stats.total_frames, 100);
        assert_eq!(report.stats.total_bytes, 50 * 417 + 50 * 1044);
        assert_eq!(report.stats.skipped_seek_headers, 2);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(
            read_xing_totals(&bytes),
            Some((Some(100), Some(50 * 417 + 50 * 1044)))
        );
        let kinds = kinds(&bytes);
        assert_eq!(kinds.len(), 101);
        assert_eq!(kinds[0], FrameKind::SeekHeader);
        assert!(kinds[1..].iter().all(|k| *k == FrameKind::Audio));
    }

    #[test]
    fn tag_precedes_seek_header() {
        let dir = tempdir().unwrap();
        let tag = id3v2_tag(500);
        let a = write_mp3(dir.path(), "0.mp3", &[tag.clone(), audio_frames(128, 50)]);
        let b = write_mp3(dir.path(), "1.mp3", &[audio_frames(320, 50)]);
        let output = dir.path().join("out.mp3");

        let mut observer = RecordingObserver::default();
        let job = MergeJob::new(&output, [&a, &b]).with_tag(true);
        let report = merge(&job, &Mp3Format::new(), &MergeConfig::default(), &mut observer).unwrap();
        assert_eq!(report.tag_bytes, Some(500));
        assert!(report.seek_header_added);
        assert_eq!(
            observer.events,
            vec!["start 0", "done 0 50", "start 1", "done 1 50", "seek", "tag 500", "finished 2"]
        );

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..500], tag.as_slice());
        assert!(is_seek_header_frame(&bytes[500..]));
        assert_eq!(read_xing_totals(&bytes[500..]).unwrap().0, Some(100));

        // The reader skips the tag and sees the header followed by 100 audio frames.
        let kinds = kinds(&bytes);
        assert_eq!(kinds.len(), 101);
        assert_eq!(kinds[0], FrameKind::SeekHeader);
    }

    #[test]
    fn tag_flag_without_tag_changes_nothing() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[audio_frames(128, 3)]);
        let output = dir.path().join("out.mp3");

        let report = run(&MergeJob::new(&output, [&a]).with_tag(true)).unwrap();
        assert!(report.tag_bytes.is_none());
        assert_eq!(std::fs::read(&output).unwrap(), audio_frames(128, 3));
    }

    #[test]
    fn truncated_tag_on_first_input_is_skipped() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[id3v2_tag(500)[..200].to_vec()]);
        let b = write_mp3(dir.path(), "1.mp3", &[audio_frames(128, 3)]);
        let output = dir.path().join("out.mp3");

        let report = run(&MergeJob::new(&output, [&a, &b]).with_tag(true)).unwrap();
        assert!(report.tag_bytes.is_none());
        assert!(!report.seek_header_added);
        assert_eq!(report.stats.total_frames, 3);
        assert_eq!(std::fs::read(&output).unwrap(), audio_frames(128, 3));
    }

    #[test]
    fn dropped_seek_header_does_not_set_baseline() {
        let dir = tempdir().unwrap();
        // The input's own header declares 128 kbps, every audio frame is 320 kbps.
        let a = write_mp3(dir.path(), "0.mp3", &[xing_frame(b"Xing"), audio_frames(320, 5)]);
        let output = dir.path().join("out.mp3");

        let report = run(&MergeJob::new(&output, [&a])).unwrap();
        assert_eq!(report.stats.skipped_seek_headers, 1);
        assert_eq!(report.stats.baseline_bit_rate, Some(320));
        assert!(!report.stats.is_variable_bit_rate);
        assert!(!report.seek_header_added);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes, audio_frames(320, 5));
        assert!(!is_seek_header_frame(&bytes));
    }

    #[test]
    fn output_listed_as_input_touches_nothing() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[audio_frames(128, 2)]);
        let b = write_mp3(dir.path(), "1.mp3", &[audio_frames(128, 2)]);

        let err = run(&MergeJob::new(&b, [&a, &b]).with_overwrite(true)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(std::fs::read(&a).unwrap(), audio_frames(128, 2));
        assert_eq!(std::fs::read(&b).unwrap(), audio_frames(128, 2));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn existing_output_without_overwrite_is_kept() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[audio_frames(128, 2)]);
        let output = dir.path().join("out.mp3");
        std::fs::write(&output, b"previous").unwrap();

        let err = run(&MergeJob::new(&output, [&a])).unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    }

    #[test]
    fn rerunning_with_overwrite_is_deterministic() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[id3v2_tag(64), audio_frames(128, 5)]);
        let b = write_mp3(dir.path(), "1.mp3", &[audio_frames(320, 5)]);
        let output = dir.path().join("out.mp3");
        let job = MergeJob::new(&output, [&a, &b])
            .with_overwrite(true)
            .with_tag(true);

        run(&job).unwrap();
        let first = std::fs::read(&output).unwrap();
        run(&job).unwrap();
        let second = std::fs::read(&output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn merge_mp3_uses_config_buffer() {
        let dir = tempdir().unwrap();
        let a = write_mp3(dir.path(), "0.mp3", &[audio_frames(128, 4)]);
        let output = dir.path().join("out.mp3");
        let config = MergeConfig {
            copy_buffer_size: 4096,
            ..MergeConfig::default()
        };

        let report = merge_mp3(&MergeJob::new(&output, [&a]), &config).unwrap();
        assert_eq!(report.stats.total_frames, 4);
        assert_eq!(report.stats.input_files, 1);
    }
}

//! mp3-merge: frame-level MP3 concatenation.
//!
//! Joins MP3 files by copying their MPEG audio frames into one output, without
//! decoding. When the inputs use more than one bitrate, a Xing seek header
//! describing the whole output is prepended; on request, the first input's
//! ID3v2 tag is copied to the front as well.
//!
//! # Modules
//!
//! - [`types`]: Core data types (Frame, Tag, MergeJob, MergeStats, MergeReport)
//! - [`audio`]: MPEG frame parsing, Xing headers, and ID3 tags
//! - [`merge`]: The merge pipeline and atomic file rewrites
//! - [`config`]: Runtime configuration (MergeConfig)
//! - [`error`]: Error types and codes (MergeError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use mp3_merge::{merge_mp3, MergeConfig, MergeJob};
//!
//! // Merge numbered chunks 0.mp3..2.mp3 from a directory
//! let job = MergeJob::from_chunks("book.mp3", Path::new("chunks"), 3)
//!     .with_overwrite(true)
//!     .with_tag(true);
//! let report = merge_mp3(&job, &MergeConfig::default())?;
//! println!("{} frames", report.stats.total_frames);
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod types;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types at crate root for convenience
pub use audio::{FrameFormat, FrameSource, Mp3Format};
pub use config::MergeConfig;
pub use error::{ErrorCode, MergeError, Result};
pub use merge::{merge, merge_mp3, MergeObserver, TracingObserver};
pub use types::{chunk_file_name, Frame, FrameKind, MergeJob, MergeReport, MergeStats, Tag};

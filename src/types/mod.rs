//! Core types for mp3-merge.
//!
//! - [`Frame`] and [`Tag`]: records produced by a frame source
//! - [`MergeJob`]: what to merge and where
//! - [`MergeStats`] and [`MergeReport`]: what a merge produced

mod frame;
mod job;
mod stats;

pub use frame::{Frame, FrameKind, Tag};
pub use job::{chunk_file_name, MergeJob};
pub use stats::{MergeReport, MergeStats};

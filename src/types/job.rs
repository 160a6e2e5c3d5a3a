//! MergeJob type describing one merge invocation.
//!
//! A MergeJob is built once by the caller (usually the CLI) and never mutated
//! by the merge itself.

use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};

/// Returns the file name used for the audio of chunk `index`.
///
/// Upstream synthesis writes one file per text chunk with this name so that
/// the chunk order can be recovered from the names alone.
pub fn chunk_file_name(index: usize) -> String {
    format!("{}.mp3", index)
}

/// A request to merge an ordered list of MP3 files into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJob {
    /// Path of the merged file.
    pub output_path: PathBuf,

    /// Inputs, in playback order.
    pub input_paths: Vec<PathBuf>,

    /// Replace `output_path` if it already exists.
    pub overwrite: bool,

    /// Copy the ID3v2 tag of the first input to the output.
    pub include_tag: bool,
}

impl MergeJob {
    /// Creates a job with overwrite and tag copying disabled.
    pub fn new<P, I, Q>(output_path: P, input_paths: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = Q>,
        Q: Into<PathBuf>,
    {
        Self {
            output_path: output_path.into(),
            input_paths: input_paths.into_iter().map(Into::into).collect(),
            overwrite: false,
            include_tag: false,
        }
    }

    /// Creates a job over `count` chunk files in `dir`, named by [`chunk_file_name`].
    pub fn from_chunks(output_path: impl Into<PathBuf>, dir: &Path, count: usize) -> Self {
        Self::new(
            output_path,
            (0..count).map(|index| dir.join(chunk_file_name(index))),
        )
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_tag(mut self, include_tag: bool) -> Self {
        self.include_tag = include_tag;
        self
    }

    /// Returns the input whose tag is copied when `include_tag` is set.
    pub fn first_input(&self) -> Option<&Path> {
        self.input_paths.first().map(PathBuf::as_path)
    }

    /// Checks the job before any file is opened or created.
    ///
    /// Fails with a validation error if there are no inputs, if the output is
    /// one of the inputs, or if the output exists and overwriting is off.
    pub fn validate(&self) -> Result<()> {
        if self.input_paths.is_empty() {
            return Err(MergeError::no_inputs());
        }

        if self
            .input_paths
            .iter()
            .any(|input| same_path(input, &self.output_path))
        {
            return Err(MergeError::output_is_input(&self.output_path));
        }

        if !self.overwrite && self.output_path.exists() {
            return Err(MergeError::output_exists(&self.output_path));
        }

        Ok(())
    }
}

/// Compares paths literally, then by resolved form.
fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Canonical path of `path`, or of its parent joined with the file name when
/// the file itself does not exist yet.
fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Some(canonical);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

//! Merge configuration module.
//!
//! Holds the tunables that are not part of a single job: default output
//! location, I/O buffer sizing, temp file naming, and the log filter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audio::DEFAULT_BUFFER_SIZE;

/// Smallest accepted copy buffer (4 KiB).
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;

/// Largest accepted copy buffer (64 MiB).
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Runtime configuration for merges.
///
/// Loaded from environment variables at startup; command-line flags take
/// precedence where both exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Output path used when none is given on the command line.
    pub default_output: PathBuf,

    /// Buffer size for reading inputs and copying during rewrites.
    pub copy_buffer_size: usize,

    /// Suffix of the sibling temp file used while prepending to the output.
    pub temp_suffix: String,

    /// tracing filter directive, e.g. "info" or "mp3_merge=debug".
    /// If None, verbosity flags decide.
    pub log_filter: Option<String>,
}

impl MergeConfig {
    /// Creates a new MergeConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a MergeConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `MP3MERGE_OUTPUT` - Default output path
    /// - `MP3MERGE_BUFFER_SIZE` - Copy buffer size in bytes (4 KiB to 64 MiB)
    /// - `MP3MERGE_TEMP_SUFFIX` - Temp file suffix
    /// - `MP3MERGE_LOG` - tracing filter directive
    ///
    /// Falls back to defaults for unset or invalid variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("MP3MERGE_OUTPUT") {
            if !path.is_empty() {
                config.default_output = PathBuf::from(path);
            }
        }

        if let Ok(size_str) = std::env::var("MP3MERGE_BUFFER_SIZE") {
            if let Ok(size) = size_str.parse::<usize>() {
                if (MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&size) {
                    config.copy_buffer_size = size;
                }
            }
        }

        if let Ok(suffix) = std::env::var("MP3MERGE_TEMP_SUFFIX") {
            if is_valid_suffix(&suffix) {
                config.temp_suffix = suffix;
            }
        }

        if let Ok(filter) = std::env::var("MP3MERGE_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = Some(filter);
            }
        }

        config
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.default_output.as_os_str().is_empty() {
            return Some("default_output must not be empty".to_string());
        }

        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&self.copy_buffer_size) {
            return Some(format!(
                "copy_buffer_size out of range: {} (must be {}..={})",
                self.copy_buffer_size, MIN_BUFFER_SIZE, MAX_BUFFER_SIZE
            ));
        }

        if !is_valid_suffix(&self.temp_suffix) {
            return Some(format!("invalid temp_suffix: {:?}", self.temp_suffix));
        }

        None
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from("output.mp3"),
            copy_buffer_size: DEFAULT_BUFFER_SIZE,
            temp_suffix: ".mp3merge.tmp".to_string(),
            log_filter: None,
        }
    }
}

/// A suffix must be non-empty and must not leave the output's directory.
fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty() && !suffix.contains('/') && !suffix.contains('\\')
}

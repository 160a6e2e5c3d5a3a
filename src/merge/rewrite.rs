//! Prepend-and-replace file rewrites.
//!
//! The new contents are written to a sibling temp file which is then renamed
//! over the target in one step. Until the rename, the target is untouched; if
//! any step fails the temp file is removed when it is dropped.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::config::MergeConfig;
use crate::error::{IoStage, MergeError, Result};

/// Rewrites files as `prefix + existing contents`.
#[derive(Debug, Clone)]
pub struct AtomicRewriter {
    buffer_size: usize,
    temp_suffix: String,
}

impl AtomicRewriter {
    pub fn new(buffer_size: usize, temp_suffix: impl Into<String>) -> Self {
        Self {
            buffer_size,
            temp_suffix: temp_suffix.into(),
        }
    }

    pub fn from_config(config: &MergeConfig) -> Self {
        Self::new(config.copy_buffer_size, config.temp_suffix.clone())
    }

    /// Replaces the file at `path` with `prefix` followed by its current contents.
    ///
    /// The file keeps its permissions. On failure the file is left as it was.
    pub fn prepend(&self, path: &Path, prefix: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", name))
            .suffix(&self.temp_suffix)
            .tempfile_in(dir)
            .map_err(|e| MergeError::io(IoStage::CreateTemp, path, e))?;
        debug!(temp = %temp.path().display(), len = prefix.len(), "prepending to file");

        let original = File::open(path).map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?;
        let permissions = original
            .metadata()
            .map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?
            .permissions();

        {
            let mut writer = BufWriter::with_capacity(self.buffer_size, temp.as_file_mut());
            let mut reader = BufReader::with_capacity(self.buffer_size, original);
            writer
                .write_all(prefix)
                .map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?;
            io::copy(&mut reader, &mut writer)
                .map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?;
            writer
                .flush()
                .map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?;
        }

        temp.as_file()
            .sync_all()
            .map_err(|e| MergeError::io(IoStage::CopyContents, path, e))?;
        fs::set_permissions(temp.path(), permissions)
            .map_err(|e| MergeError::io(IoStage::ReplaceFile, path, e))?;

        temp.persist(path)
            .map_err(|e| MergeError::io(IoStage::ReplaceFile, path, e.error))?;
        Ok(())
    }
}

impl Default for AtomicRewriter {
    fn default() -> Self {
        Self::from_config(&MergeConfig::default())
    }
}

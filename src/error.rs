//! Error types for mp3-merge.
//!
//! Every stage of a merge returns [`Result`]; nothing in the library exits the
//! process. The binary decides how to report a failure.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error codes identifying the class of a merge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The job was rejected before any file was opened or created.
    /// Trigger: output exists without overwrite, output listed as input, no inputs.
    Validation,

    /// Opening, reading, writing, copying, or replacing a file failed.
    Io,

    /// An input could not be parsed as an MPEG audio stream.
    /// Trigger: no frames found, totals overflow the seek header.
    Format,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::Io => "IO_ERROR",
            ErrorCode::Format => "FORMAT_ERROR",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "The merge job is invalid",
            ErrorCode::Io => "A file operation failed during the merge",
            ErrorCode::Format => "An input is not a readable MPEG audio stream",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::Validation => {
                "Pass --force to overwrite an existing output, and make sure the output \
                 path is not also one of the inputs"
            }
            ErrorCode::Io => {
                "Check that every input exists and is readable, that the output directory \
                 is writable, and that there is enough free disk space"
            }
            ErrorCode::Format => {
                "Make sure every input is an MP3 file (not WAV or LINEAR16 audio) and \
                 re-create any chunk that was truncated"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The file operation that was running when an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    OpenInput,
    CreateOutput,
    WriteOutput,
    CreateTemp,
    CopyContents,
    ReplaceFile,
    ListDirectory,
}

impl IoStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoStage::OpenInput => "open input",
            IoStage::CreateOutput => "create output",
            IoStage::WriteOutput => "write output",
            IoStage::CreateTemp => "create temporary file for",
            IoStage::CopyContents => "copy contents of",
            IoStage::ReplaceFile => "replace",
            IoStage::ListDirectory => "list directory",
        }
    }
}

/// Main error type for merge operations.
#[derive(Debug)]
pub struct MergeError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// File the error relates to, when known.
    pub path: Option<PathBuf>,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl MergeError {
    /// Creates a new MergeError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Creates a new MergeError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attaches a path unless one is already recorded.
    pub fn at_path(mut self, path: impl AsRef<Path>) -> Self {
        if self.path.is_none() {
            self.path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates a VALIDATION_ERROR for an output that exists without overwrite.
    pub fn output_exists(path: &Path) -> Self {
        Self::new(
            ErrorCode::Validation,
            format!("the file '{}' already exists", path.display()),
        )
        .at_path(path)
    }

    /// Creates a VALIDATION_ERROR for an output that is also an input.
    pub fn output_is_input(path: &Path) -> Self {
        Self::new(
            ErrorCode::Validation,
            format!(
                "the list of input files includes the output file '{}'",
                path.display()
            ),
        )
        .at_path(path)
    }

    /// Creates a VALIDATION_ERROR for an empty input list.
    pub fn no_inputs() -> Self {
        Self::new(ErrorCode::Validation, "no input files to merge")
    }

    /// Creates an IO_ERROR for a failed stage on a path.
    pub fn io(stage: IoStage, path: &Path, err: io::Error) -> Self {
        Self::with_source(
            ErrorCode::Io,
            format!("failed to {} '{}': {}", stage.as_str(), path.display(), err),
            err,
        )
        .at_path(path)
    }

    /// Creates a FORMAT_ERROR.
    pub fn format(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::Format, reason)
    }

    /// Returns true for errors detected before any file was touched.
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if self.code == ErrorCode::Format {
            if let Some(path) = &self.path {
                write!(f, " (in '{}')", path.display())?;
            }
        }
        write!(f, ". Recovery: {}", self.code.recovery_hint())
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using MergeError.
pub type Result<T> = std::result::Result<T, MergeError>;

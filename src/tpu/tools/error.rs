use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads sheets, consolidates them, or writes the collection.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a single sheet cannot be turned into records. Recovered per
    /// file by the consolidator.
    #[error("unusable sheet {path}: {reason}")]
    SheetParse { path: PathBuf, reason: String },

    /// Raised when the input directory does not exist or is not a directory.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Raised when the input directory holds no spreadsheet with the expected
    /// extension.
    #[error("no .{extension} files found in {directory}")]
    NoInputFiles {
        directory: PathBuf,
        extension: String,
    },

    /// Raised when every sheet was read but none yielded a record.
    #[error("no valid data found in {0}")]
    NoValidData(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Builds a [`ToolError::SheetParse`] for the given file.
    pub fn sheet(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ToolError::SheetParse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for the command line. Conditions where nothing went
    /// wrong but nothing was produced exit with `2`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::NoInputFiles { .. } | ToolError::NoValidData(_) => 2,
            _ => 1,
        }
    }
}

//! Error types for the tagger module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing tags.
#[derive(Debug, Error)]
pub enum TagError {
    /// The target file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The existing tag container could not be read.
    #[error("Failed to read tags from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The tag container could not be written back.
    #[error("Failed to write tags to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// The blocking tag task panicked or was cancelled.
    #[error("Tag task failed: {0}")]
    TaskFailed(String),
}

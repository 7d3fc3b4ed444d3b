//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching and encoding remote audio.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// yt-dlp binary not found.
    #[error("yt-dlp not found at path: {path}")]
    YtDlpNotFound { path: PathBuf },

    /// The source URL was empty.
    #[error("Source URL is empty")]
    EmptyUrl,

    /// The extractor reported a failure (unreachable URL, unsupported site,
    /// no audio stream, ...).
    #[error("{reason}")]
    ExtractionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The extractor exited successfully but left no audio file behind.
    #[error("Expected output file was not created: {path}")]
    OutputMissing { path: PathBuf },

    /// Download timed out.
    #[error("Download timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while running the extractor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetcherError {
    /// Creates a new extraction failed error with stderr output.
    pub fn extraction_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
            stderr,
        }
    }
}

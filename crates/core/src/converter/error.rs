//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or trimming audio.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// FFmpeg run failed.
    #[error("Trim failed: {reason}")]
    TrimFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// FFmpeg run timed out.
    #[error("FFmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Failed to probe media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// I/O error while running ffmpeg.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse FFprobe output.
    #[error("Failed to parse media info: {reason}")]
    ParseError { reason: String },
}

impl ConverterError {
    /// Creates a new trim failed error with stderr output.
    pub fn trim_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::TrimFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Message including captured stderr, for surfacing to clients.
    pub fn detailed_message(&self) -> String {
        match self {
            Self::TrimFailed {
                reason,
                stderr: Some(stderr),
            } => format!("{}: {}", reason, stderr.trim()),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_message_includes_stderr() {
        let err = ConverterError::trim_failed(
            "FFmpeg exited with code: Some(1)",
            Some("Invalid data found when processing input\n".to_string()),
        );
        assert_eq!(
            err.detailed_message(),
            "FFmpeg exited with code: Some(1): Invalid data found when processing input"
        );
    }

    #[test]
    fn test_detailed_message_without_stderr() {
        let err = ConverterError::probe_failed("no streams");
        assert_eq!(err.detailed_message(), "Failed to probe media file: no streams");
    }
}

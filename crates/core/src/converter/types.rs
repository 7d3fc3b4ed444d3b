//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A clamped sub-range of an audio file, in milliseconds.
///
/// Always satisfies `start_ms <= end_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TrimWindow {
    /// Length of the window in milliseconds.
    pub fn len_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Whether the window selects no audio at all.
    pub fn is_empty(&self) -> bool {
        self.start_ms == self.end_ms
    }
}

/// Formats milliseconds as an ffmpeg time offset (`SS.mmm`).
pub(crate) fn ffmpeg_timestamp(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// A trim job request.
#[derive(Debug, Clone)]
pub struct TrimJob {
    /// Unique job ID (usually the request ID).
    pub job_id: String,
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Range of the input to keep.
    pub window: TrimWindow,
    /// MP3 bitrate for the re-encode.
    pub bitrate_kbps: u32,
}

/// Result of a successful trim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimOutput {
    /// Job ID.
    pub job_id: String,
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock time spent in ffmpeg, in milliseconds.
    pub elapsed_ms: u64,
    /// The window that was extracted.
    pub window: TrimWindow,
}

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File path.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Container format (e.g., "mp3").
    pub format: String,
    /// Audio codec (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Audio bitrate in kbps (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate_kbps: Option<u32>,
    /// Audio sample rate (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_sample_rate: Option<u32>,
    /// Audio channels (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_channels: Option<u8>,
}

impl MediaInfo {
    /// Duration in whole milliseconds, truncated.
    pub fn duration_ms(&self) -> u64 {
        if self.duration_secs.is_finite() && self.duration_secs > 0.0 {
            (self.duration_secs * 1000.0) as u64
        } else {
            0
        }
    }
}

//! Configuration for the fetcher module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the yt-dlp based fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Path to yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Directory or binary path handed to `--ffmpeg-location`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_location: Option<PathBuf>,

    /// Timeout for a single download in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Additional yt-dlp arguments, inserted before the URL.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            ffmpeg_location: None,
            timeout_secs: default_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl FetcherConfig {
    /// Creates a config pointing at a specific yt-dlp binary.
    pub fn with_path(ytdlp_path: PathBuf) -> Self {
        Self {
            ytdlp_path,
            ..Default::default()
        }
    }
}

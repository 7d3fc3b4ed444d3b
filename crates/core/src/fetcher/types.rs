//! Types for the fetcher module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title used when the source does not provide one.
pub const FALLBACK_TITLE: &str = "audio";

/// A fetch+encode request.
#[derive(Debug, Clone)]
pub struct FetchJob {
    /// Unique job ID (usually the request ID).
    pub job_id: String,
    /// Remote media URL.
    pub url: String,
    /// Directory the encoded file is written to.
    pub output_dir: PathBuf,
    /// File name of the encoded file, without extension.
    pub file_stem: String,
    /// MP3 bitrate in kbps.
    pub bitrate_kbps: u32,
}

impl FetchJob {
    /// Path of the MP3 the extractor is expected to produce.
    pub fn expected_output(&self) -> PathBuf {
        self.output_dir.join(format!("{}.mp3", self.file_stem))
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedAudio {
    /// Job ID.
    pub job_id: String,
    /// Path of the encoded MP3.
    pub path: PathBuf,
    /// Title reported by the source.
    pub title: String,
    /// Size of the encoded file in bytes.
    pub size_bytes: u64,
    /// Wall-clock time spent in the extractor, in milliseconds.
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_output() {
        let job = FetchJob {
            job_id: "j".to_string(),
            url: "https://example.com/watch?v=1".to_string(),
            output_dir: PathBuf::from("/scratch/req"),
            file_stem: "0b5e".to_string(),
            bitrate_kbps: 192,
        };
        assert_eq!(job.expected_output(), PathBuf::from("/scratch/req/0b5e.mp3"));
    }
}

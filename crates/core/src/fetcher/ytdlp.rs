//! yt-dlp based fetcher implementation.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::FetcherConfig;
use super::error::FetcherError;
use super::traits::Fetcher;
use super::types::{FetchJob, FetchedAudio, FALLBACK_TITLE};

/// Matches the `ERROR: ...` lines yt-dlp prints on stderr.
static ERROR_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ERROR:\s*(.+)$").unwrap());

/// Fetcher that shells out to yt-dlp and lets it run ffmpeg for the MP3 encode.
pub struct YtDlpFetcher {
    config: FetcherConfig,
}

impl YtDlpFetcher {
    /// Creates a new yt-dlp fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Creates a fetcher with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FetcherConfig::default())
    }

    /// Builds yt-dlp arguments for a job.
    fn build_args(&self, job: &FetchJob) -> Vec<String> {
        let template = job
            .output_dir
            .join(format!("{}.%(ext)s", job.file_stem))
            .to_string_lossy()
            .to_string();

        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "-f".to_string(),
            "bestaudio/best".to_string(),
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            format!("{}K", job.bitrate_kbps),
            "-o".to_string(),
            template,
            // --print implies --simulate; we want the download too
            "--no-simulate".to_string(),
            "--print".to_string(),
            "title".to_string(),
        ];

        if let Some(ref location) = self.config.ffmpeg_location {
            args.extend([
                "--ffmpeg-location".to_string(),
                location.to_string_lossy().to_string(),
            ]);
        }

        args.extend(self.config.extra_args.iter().cloned());

        // Keep a URL starting with '-' from being read as an option
        args.push("--".to_string());
        args.push(job.url.clone());

        args
    }

    /// Picks the title out of yt-dlp stdout.
    fn parse_title(stdout: &str) -> String {
        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && *line != "NA")
            .unwrap_or(FALLBACK_TITLE)
            .to_string()
    }

    /// Condenses yt-dlp stderr into a one-line failure reason.
    fn parse_error(stderr: &str) -> String {
        let reported: Vec<&str> = stderr
            .lines()
            .filter_map(|line| ERROR_LINE.captures(line.trim()))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        if !reported.is_empty() {
            return reported.join("; ");
        }

        stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or("yt-dlp failed without output")
            .to_string()
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(&self, job: FetchJob) -> Result<FetchedAudio, FetcherError> {
        if job.url.trim().is_empty() {
            return Err(FetcherError::EmptyUrl);
        }

        let start = Instant::now();
        let args = self.build_args(&job);
        debug!(job_id = %job.job_id, ?args, "Running yt-dlp");

        let child = Command::new(&self.config.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetcherError::YtDlpNotFound {
                        path: self.config.ytdlp_path.clone(),
                    }
                } else {
                    FetcherError::Io(e)
                }
            })?;

        // Dropping the future on timeout kills the child (kill_on_drop)
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetcherError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(FetcherError::extraction_failed(
                Self::parse_error(&stderr),
                if stderr.trim().is_empty() {
                    None
                } else {
                    Some(stderr.to_string())
                },
            ));
        }

        let path = job.expected_output();
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| FetcherError::OutputMissing { path: path.clone() })?;

        Ok(FetchedAudio {
            job_id: job.job_id,
            path,
            title: Self::parse_title(&stdout),
            size_bytes: meta.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), FetcherError> {
        let result = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(FetcherError::extraction_failed(
                format!("yt-dlp --version exited with code: {:?}", output.status.code()),
                None,
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetcherError::YtDlpNotFound {
                    path: self.config.ytdlp_path.clone(),
                })
            }
            Err(e) => Err(FetcherError::Io(e)),
        }
    }
}

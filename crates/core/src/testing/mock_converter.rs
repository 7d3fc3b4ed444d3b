//! Mock converter for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{Converter, ConverterError, MediaInfo, TrimJob, TrimOutput};

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Fixed probe duration for every file
/// - Track trim jobs for assertions
/// - Simulate failure of the next operation
///
/// Trimming copies the input to the output path unchanged.
#[derive(Debug)]
pub struct MockConverter {
    /// Duration reported by `probe`.
    duration_secs: Arc<RwLock<f64>>,
    /// Recorded trim jobs.
    trims: Arc<RwLock<Vec<TrimJob>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter reporting a 180 second duration.
    pub fn new() -> Self {
        Self {
            duration_secs: Arc::new(RwLock::new(180.0)),
            trims: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the duration returned by `probe`.
    pub async fn set_duration_secs(&self, secs: f64) {
        *self.duration_secs.write().await = secs;
    }

    /// Get all recorded trim jobs.
    pub async fn recorded_trims(&self) -> Vec<TrimJob> {
        self.trims.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let size_bytes = tokio::fs::metadata(path)
            .await
            .map_err(|_| ConverterError::InputNotFound {
                path: path.to_path_buf(),
            })?
            .len();

        Ok(MediaInfo {
            path: path.to_path_buf(),
            size_bytes,
            duration_secs: *self.duration_secs.read().await,
            format: "mp3".to_string(),
            audio_codec: Some("mp3".to_string()),
            audio_bitrate_kbps: Some(192),
            audio_sample_rate: Some(44100),
            audio_channels: Some(2),
        })
    }

    async fn trim(&self, job: TrimJob) -> Result<TrimOutput, ConverterError> {
        self.trims.write().await.push(job.clone());

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let output_size_bytes = tokio::fs::copy(&job.input_path, &job.output_path).await?;

        Ok(TrimOutput {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes,
            elapsed_ms: 0,
            window: job.window,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}

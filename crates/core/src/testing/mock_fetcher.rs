//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchJob, FetchedAudio, Fetcher, FetcherError};

/// Bytes written as the "downloaded" audio unless overridden.
pub const MOCK_AUDIO: &[u8] = b"\xff\xfb\x90\x64mock mpeg audio payload";

/// Mock implementation of the Fetcher trait.
///
/// Writes a small fake MP3 to the job's expected output and reports a
/// configurable title. Jobs are recorded for assertions.
#[derive(Debug)]
pub struct MockFetcher {
    title: Arc<RwLock<String>>,
    payload: Arc<RwLock<Vec<u8>>>,
    jobs: Arc<RwLock<Vec<FetchJob>>>,
    next_error: Arc<RwLock<Option<FetcherError>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            title: Arc::new(RwLock::new("Mock Video".to_string())),
            payload: Arc::new(RwLock::new(MOCK_AUDIO.to_vec())),
            jobs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the title reported for fetched media.
    pub async fn set_title(&self, title: impl Into<String>) {
        *self.title.write().await = title.into();
    }

    /// Set the bytes written as the fetched file.
    pub async fn set_payload(&self, payload: impl Into<Vec<u8>>) {
        *self.payload.write().await = payload.into();
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetcherError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetch jobs.
    pub async fn recorded_jobs(&self) -> Vec<FetchJob> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, job: FetchJob) -> Result<FetchedAudio, FetcherError> {
        self.jobs.write().await.push(job.clone());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let path = job.expected_output();
        let payload = self.payload.read().await.clone();
        tokio::fs::write(&path, &payload).await?;

        Ok(FetchedAudio {
            job_id: job.job_id,
            path,
            title: self.title.read().await.clone(),
            size_bytes: payload.len() as u64,
            elapsed_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), FetcherError> {
        Ok(())
    }
}

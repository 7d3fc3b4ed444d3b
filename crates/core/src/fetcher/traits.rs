//! Trait definitions for the fetcher module.

use async_trait::async_trait;

use super::error::FetcherError;
use super::types::{FetchJob, FetchedAudio};

/// Downloads remote media and encodes its audio track to MP3.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Downloads `job.url` and writes the encoded audio to `job.expected_output()`.
    async fn fetch(&self, job: FetchJob) -> Result<FetchedAudio, FetcherError>;

    /// Validates that the fetcher is properly configured and ready.
    async fn validate(&self) -> Result<(), FetcherError>;
}

//! Mock tag writer for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::tagger::{TagError, TagReport, TagWriter, TrackMetadata};

/// A recorded tag write.
#[derive(Debug, Clone)]
pub struct RecordedTagWrite {
    pub path: PathBuf,
    pub metadata: TrackMetadata,
}

/// Mock implementation of the TagWriter trait.
///
/// Records every call without touching the file. Can be told to fail every
/// write to exercise the warning path.
#[derive(Debug, Default)]
pub struct MockTagWriter {
    writes: Arc<RwLock<Vec<RecordedTagWrite>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MockTagWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with `reason`.
    pub async fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write().await = Some(reason.into());
    }

    /// Get all recorded writes.
    pub async fn recorded_writes(&self) -> Vec<RecordedTagWrite> {
        self.writes.read().await.clone()
    }
}

#[async_trait]
impl TagWriter for MockTagWriter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn write(&self, path: &Path, metadata: &TrackMetadata) -> Result<TagReport, TagError> {
        self.writes.write().await.push(RecordedTagWrite {
            path: path.to_path_buf(),
            metadata: metadata.clone(),
        });

        if let Some(reason) = self.failure.read().await.clone() {
            return Err(TagError::WriteFailed {
                path: path.to_path_buf(),
                reason,
            });
        }

        Ok(TagReport {
            frames_written: metadata
                .frames()
                .into_iter()
                .map(|(id, _)| id.to_string())
                .collect(),
            had_existing_tag: false,
        })
    }
}

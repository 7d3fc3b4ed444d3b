//! Trait definitions for the tagger module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TagError;
use super::types::{TagReport, TrackMetadata};

/// Embeds text metadata into an audio file in place.
#[async_trait]
pub trait TagWriter: Send + Sync {
    /// Returns the name of this tag writer implementation.
    fn name(&self) -> &str;

    /// Sets every frame in `metadata.frames()` on the file at `path`.
    ///
    /// Frames not named by `metadata` are left as they are. Creates the tag
    /// container when the file has none.
    async fn write(&self, path: &Path, metadata: &TrackMetadata) -> Result<TagReport, TagError>;
}

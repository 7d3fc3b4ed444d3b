//! ID3v2 tag writer backed by the `id3` crate.

use async_trait::async_trait;
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::TagError;
use super::traits::TagWriter;
use super::types::{TagReport, TrackMetadata};

/// Writes ID3v2.4 text frames in place.
#[derive(Debug, Clone, Default)]
pub struct Id3TagWriter;

impl Id3TagWriter {
    pub fn new() -> Self {
        Self
    }

    /// Loads the existing tag, or starts an empty one when the file has none.
    fn load_tag(path: &Path) -> Result<(Tag, bool), TagError> {
        match Tag::read_from_path(path) {
            Ok(tag) => Ok((tag, true)),
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok((Tag::new(), false)),
            Err(e) if matches!(e.kind, ErrorKind::Io(_)) => Err(TagError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(e) => {
                // Corrupt container: keep whatever frames could be decoded
                warn!(path = %path.display(), error = %e, "Existing tag is unreadable, rewriting it");
                let had_tag = e.partial_tag.is_some();
                Ok((e.partial_tag.unwrap_or_else(Tag::new), had_tag))
            }
        }
    }

    fn write_blocking(path: PathBuf, metadata: TrackMetadata) -> Result<TagReport, TagError> {
        if !path.exists() {
            return Err(TagError::FileNotFound { path });
        }

        let (mut tag, had_existing_tag) = Self::load_tag(&path)?;

        let mut frames_written = Vec::new();
        for (id, value) in metadata.frames() {
            tag.set_text(id, value);
            frames_written.push(id.to_string());
        }

        tag.write_to_path(&path, Version::Id3v24)
            .map_err(|e| TagError::WriteFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), frames = ?frames_written, "Tags written");

        Ok(TagReport {
            frames_written,
            had_existing_tag,
        })
    }
}

#[async_trait]
impl TagWriter for Id3TagWriter {
    fn name(&self) -> &str {
        "id3"
    }

    async fn write(&self, path: &Path, metadata: &TrackMetadata) -> Result<TagReport, TagError> {
        let path = path.to_path_buf();
        let metadata = metadata.clone();

        tokio::task::spawn_blocking(move || Self::write_blocking(path, metadata))
            .await
            .map_err(|e| TagError::TaskFailed(e.to_string()))?
    }
}

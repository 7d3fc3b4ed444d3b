//! Types for the tagger module.

use serde::{Deserialize, Serialize};

/// ID3v2 frame identifiers written by the tag stage.
pub mod frame_ids {
    pub const TITLE: &str = "TIT2";
    pub const ARTIST: &str = "TPE1";
    pub const ALBUM_ARTIST: &str = "TPE2";
    pub const ALBUM: &str = "TALB";
    pub const GENRE: &str = "TCON";
}

/// User-supplied text metadata. Blank values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TrackMetadata {
    /// Builds metadata, dropping empty or whitespace-only values.
    pub fn new(
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        genre: Option<String>,
    ) -> Self {
        Self {
            title: non_blank(title),
            artist: non_blank(artist),
            album: non_blank(album),
            genre: non_blank(genre),
        }
    }

    /// True when there is nothing to write, i.e. the tag stage is skipped.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.genre.is_none()
    }

    /// Frames to set, in write order. The artist fills both the performer
    /// and the album-artist frame.
    pub fn frames(&self) -> Vec<(&'static str, &str)> {
        let mut frames = Vec::new();
        if let Some(ref title) = self.title {
            frames.push((frame_ids::TITLE, title.as_str()));
        }
        if let Some(ref artist) = self.artist {
            frames.push((frame_ids::ARTIST, artist.as_str()));
            frames.push((frame_ids::ALBUM_ARTIST, artist.as_str()));
        }
        if let Some(ref album) = self.album {
            frames.push((frame_ids::ALBUM, album.as_str()));
        }
        if let Some(ref genre) = self.genre {
            frames.push((frame_ids::GENRE, genre.as_str()));
        }
        frames
    }
}

/// Outcome of a successful tag write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReport {
    /// Frame IDs that were set.
    pub frames_written: Vec<String>,
    /// Whether the file already carried a tag container.
    pub had_existing_tag: bool,
}

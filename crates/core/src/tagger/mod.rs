//! Tagger module for embedding user metadata as ID3 frames.
//!
//! Mapping: title → TIT2, artist → TPE1 and TPE2, album → TALB, genre → TCON.
//! Frames not named by the metadata are never removed.

mod error;
mod id3_writer;
mod traits;
mod types;

pub use error::TagError;
pub use id3_writer::Id3TagWriter;
pub use traits::TagWriter;
pub use types::{frame_ids, TagReport, TrackMetadata};

//! Fetcher module for downloading remote media as MP3.
//!
//! The `Fetcher` trait hides the media extractor; `YtDlpFetcher` drives the
//! `yt-dlp` binary, which downloads the best audio stream and encodes it with
//! ffmpeg at the requested bitrate.

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::FetcherConfig;
pub use error::FetcherError;
pub use traits::Fetcher;
pub use types::{FetchJob, FetchedAudio, FALLBACK_TITLE};
pub use ytdlp::YtDlpFetcher;

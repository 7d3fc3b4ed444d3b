//! Converter module for measuring and slicing audio files.
//!
//! This module provides the `Converter` trait and an FFmpeg implementation
//! used by the trim stage of the conversion pipeline.
//!
//! # Example
//!
//! ```ignore
//! use tubetape_core::converter::{FfmpegConverter, Converter, TrimJob, TrimWindow};
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let info = converter.probe(Path::new("/scratch/abc.mp3")).await?;
//! println!("Duration: {} ms", info.duration_ms());
//!
//! let output = converter
//!     .trim(TrimJob {
//!         job_id: "req-1".to_string(),
//!         input_path: PathBuf::from("/scratch/abc.mp3"),
//!         output_path: PathBuf::from("/scratch/def_trimmed.mp3"),
//!         window: TrimWindow { start_ms: 10_000, end_ms: 40_000 },
//!         bitrate_kbps: 192,
//!     })
//!     .await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{MediaInfo, TrimJob, TrimOutput, TrimWindow};

//! Conversion pipeline: fetch, optional trim, optional tag.
//!
//! Each request runs in its own scratch directory. Failures remove it
//! immediately; on success it travels with the [`ConversionResult`] until the
//! file has been handed to the client.
//!
//! ```text
//! Received -> Fetching -> (Trimming)? -> (Tagging)? -> Delivering -> Completed
//!                  \            \             (warning only)
//!                   +------------+--> Failed
//! ```

mod error;
mod runner;
mod trim;
mod types;

pub use error::PipelineError;
pub use runner::ConversionPipeline;
pub use trim::clamp_window;
pub use types::{
    display_title, ConversionOutcome, ConversionRequest, ConversionRequestBody, ConversionResult,
    PipelineStage, PipelineWarning, TrimBounds, FILENAME_TITLE_CHARS,
};

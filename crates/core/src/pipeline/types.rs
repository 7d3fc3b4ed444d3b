//! Request and result types for the conversion pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::PipelineError;
use crate::scratch::ScratchDir;
use crate::tagger::TrackMetadata;

/// Number of characters of the source title used for the default filename.
pub const FILENAME_TITLE_CHARS: usize = 50;

/// The JSON body accepted by the convert endpoint.
///
/// Trim bounds stay as raw JSON values so numbers and numeric strings can
/// both be accepted, and anything else rejected with a precise message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConversionRequestBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Requested trim bounds in seconds. Values are always finite.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimBounds {
    pub start_secs: Option<f64>,
    pub end_secs: Option<f64>,
}

impl TrimBounds {
    pub fn new(start_secs: Option<f64>, end_secs: Option<f64>) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Whether the trim stage runs: a positive start, or any end.
    pub fn applies(&self) -> bool {
        self.start_secs.is_some_and(|s| s > 0.0) || self.end_secs.is_some()
    }
}

/// A validated conversion request.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_url: String,
    pub trim: TrimBounds,
    pub metadata: TrackMetadata,
    /// User-chosen output title; `None` when absent or blank.
    pub title: Option<String>,
}

impl ConversionRequest {
    /// Validates a wire body.
    ///
    /// Fails when the URL is missing or blank, or when a bound is not a
    /// finite number (or a string holding one).
    pub fn from_body(body: ConversionRequestBody) -> Result<Self, PipelineError> {
        let source_url = body
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(PipelineError::MissingUrl)?
            .to_string();

        let trim = TrimBounds::new(
            parse_bound("start", body.start.as_ref())?,
            parse_bound("end", body.end.as_ref())?,
        );

        let title = non_blank(body.title.clone());
        let metadata = TrackMetadata::new(body.title, body.artist, body.album, body.genre);

        Ok(Self {
            source_url,
            trim,
            metadata,
            title,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads a bound from JSON. `null` and blank strings count as absent.
fn parse_bound(name: &str, value: Option<&Value>) -> Result<Option<f64>, PipelineError> {
    let secs = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| invalid_bound(name, n))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid_bound(name, format!("{:?}", s)))?,
        Some(other) => return Err(invalid_bound(name, other)),
    };

    if !secs.is_finite() {
        return Err(invalid_bound(name, secs));
    }
    Ok(Some(secs))
}

fn invalid_bound(name: &str, shown: impl fmt::Display) -> PipelineError {
    PipelineError::Validation(format!("Invalid {} time: {}", name, shown))
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Fetching,
    Trimming,
    Tagging,
    Delivering,
    Completed,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Fetching => "fetching",
            Self::Trimming => "trimming",
            Self::Tagging => "tagging",
            Self::Delivering => "delivering",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem encountered while converting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// Tags could not be written; the audio is delivered untagged.
    MetadataWriteFailed { reason: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataWriteFailed { reason } => {
                write!(f, "metadata write failed: {}", reason)
            }
        }
    }
}

/// The final audio file, still owned by its scratch directory.
#[derive(Debug)]
pub struct ConversionResult {
    /// Path of the file to deliver.
    pub file_path: PathBuf,
    /// Name (without extension) to offer the download under.
    pub display_title: String,
    /// Title reported by the source.
    pub source_title: String,
    /// Scratch directory holding `file_path`.
    pub scratch: ScratchDir,
}

impl ConversionResult {
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// `display_title` with the `.mp3` extension.
    pub fn download_filename(&self) -> String {
        format!("{}.mp3", self.display_title)
    }
}

/// A successful conversion plus any warnings raised along the way.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub result: ConversionResult,
    pub warnings: Vec<PipelineWarning>,
}

/// Picks the download name: the user title when given, otherwise the first
/// [`FILENAME_TITLE_CHARS`] characters of the source title.
pub fn display_title(user_title: Option<&str>, source_title: &str) -> String {
    match user_title {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => source_title.chars().take(FILENAME_TITLE_CHARS).collect(),
    }
}

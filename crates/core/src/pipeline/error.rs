//! Error types for the conversion pipeline.

use thiserror::Error;

use super::types::PipelineStage;
use crate::converter::ConverterError;
use crate::fetcher::FetcherError;
use crate::scratch::ScratchError;

/// Errors that fail a conversion request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request carried no source URL.
    #[error("Missing YouTube URL")]
    MissingUrl,

    /// The request body was malformed.
    #[error("{0}")]
    Validation(String),

    /// A processing stage failed; nothing is delivered.
    #[error("Conversion failed: {message}")]
    ConversionFailed {
        stage: PipelineStage,
        message: String,
    },
}

impl PipelineError {
    pub fn conversion_failed(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self::ConversionFailed {
            stage,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the client's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingUrl | Self::Validation(_))
    }

    /// Stage the failure happened in, if any processing had started.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::ConversionFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<FetcherError> for PipelineError {
    fn from(e: FetcherError) -> Self {
        Self::conversion_failed(PipelineStage::Fetching, e.to_string())
    }
}

impl From<ConverterError> for PipelineError {
    fn from(e: ConverterError) -> Self {
        Self::conversion_failed(PipelineStage::Trimming, e.detailed_message())
    }
}

impl From<ScratchError> for PipelineError {
    fn from(e: ScratchError) -> Self {
        Self::conversion_failed(PipelineStage::Received, e.to_string())
    }
}

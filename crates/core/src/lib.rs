pub mod config;
pub mod converter;
pub mod fetcher;
pub mod metrics;
pub mod pipeline;
pub mod scratch;
pub mod tagger;
pub mod testing;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{Converter, ConverterConfig, ConverterError, FfmpegConverter};
pub use fetcher::{Fetcher, FetcherConfig, FetcherError, YtDlpFetcher};
pub use pipeline::{
    ConversionOutcome, ConversionPipeline, ConversionRequest, ConversionRequestBody,
    ConversionResult, PipelineError, PipelineStage, PipelineWarning,
};
pub use scratch::{ScratchDir, ScratchError, ScratchSpace};
pub use tagger::{Id3TagWriter, TagError, TagWriter, TrackMetadata};

use tubetape_core::{Config, ConversionPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: ConversionPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: ConversionPipeline) -> Self {
        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &ConversionPipeline {
        &self.pipeline
    }
}

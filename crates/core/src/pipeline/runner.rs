//! Conversion pipeline orchestration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

use super::error::PipelineError;
use super::trim::clamp_window;
use super::types::{
    display_title, ConversionOutcome, ConversionRequest, ConversionResult, PipelineStage,
    PipelineWarning,
};
use crate::converter::{Converter, TrimJob};
use crate::fetcher::{FetchJob, Fetcher};
use crate::metrics;
use crate::scratch::{ScratchDir, ScratchSpace};
use crate::tagger::TagWriter;

/// Runs fetch, trim and tag for one request inside its own scratch directory.
///
/// Holds no per-request state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct ConversionPipeline {
    fetcher: Arc<dyn Fetcher>,
    converter: Arc<dyn Converter>,
    tagger: Arc<dyn TagWriter>,
    scratch: ScratchSpace,
    bitrate_kbps: u32,
}

/// What the stages produced before delivery.
struct StagesOutput {
    file_path: PathBuf,
    source_title: String,
    warnings: Vec<PipelineWarning>,
}

impl ConversionPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        converter: Arc<dyn Converter>,
        tagger: Arc<dyn TagWriter>,
        scratch: ScratchSpace,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            fetcher,
            converter,
            tagger,
            scratch,
            bitrate_kbps,
        }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Runs the pipeline.
    ///
    /// On success the caller owns the scratch directory through the returned
    /// result and must drop or remove it after delivery. On failure the
    /// scratch directory is already gone.
    pub async fn run(&self, request: ConversionRequest) -> Result<ConversionOutcome, PipelineError> {
        let scratch = self.scratch.allocate().await.map_err(|e| {
            error!(error = %e, "Failed to allocate scratch directory");
            metrics::CONVERSIONS_TOTAL.with_label_values(&["failed"]).inc();
            PipelineError::from(e)
        })?;

        let span = info_span!("conversion", request_id = %scratch.id());
        self.run_in(scratch, request).instrument(span).await
    }

    async fn run_in(
        &self,
        scratch: ScratchDir,
        request: ConversionRequest,
    ) -> Result<ConversionOutcome, PipelineError> {
        info!(stage = %PipelineStage::Received, url = %request.source_url, "Conversion started");

        match self.run_stages(&scratch, &request).await {
            Ok(output) => {
                let display_title = display_title(request.title.as_deref(), &output.source_title);
                info!(
                    stage = %PipelineStage::Delivering,
                    file = %output.file_path.display(),
                    warnings = output.warnings.len(),
                    "Conversion ready for delivery"
                );
                metrics::CONVERSIONS_TOTAL.with_label_values(&["success"]).inc();

                Ok(ConversionOutcome {
                    result: ConversionResult {
                        file_path: output.file_path,
                        display_title,
                        source_title: output.source_title,
                        scratch,
                    },
                    warnings: output.warnings,
                })
            }
            Err(e) => {
                error!(stage = %PipelineStage::Failed, error = %e, "Conversion failed");
                metrics::CONVERSIONS_TOTAL.with_label_values(&["failed"]).inc();
                if let Err(cleanup) = scratch.remove().await {
                    warn!(error = %cleanup, "Failed to clean up after failed conversion");
                }
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        scratch: &ScratchDir,
        request: &ConversionRequest,
    ) -> Result<StagesOutput, PipelineError> {
        let mut warnings = Vec::new();

        // Fetch + encode
        info!(stage = %PipelineStage::Fetching, "Downloading audio");
        let started = Instant::now();
        let fetched = self
            .fetcher
            .fetch(FetchJob {
                job_id: scratch.id().to_string(),
                url: request.source_url.clone(),
                output_dir: scratch.path().to_path_buf(),
                file_stem: scratch.unique_stem(),
                bitrate_kbps: self.bitrate_kbps,
            })
            .await?;
        observe_stage(PipelineStage::Fetching, started);
        info!(title = %fetched.title, size_bytes = fetched.size_bytes, "Audio downloaded");

        let mut file_path = fetched.path;

        // Trim
        if request.trim.applies() {
            let started = Instant::now();
            let info = self.converter.probe(&file_path).await?;
            let window = clamp_window(&request.trim, info.duration_ms());
            info!(
                stage = %PipelineStage::Trimming,
                start_ms = window.start_ms,
                end_ms = window.end_ms,
                duration_ms = info.duration_ms(),
                "Trimming audio"
            );
            if window.is_empty() {
                warn!("Trim window is empty, output will contain no audio");
            }

            let output = self
                .converter
                .trim(TrimJob {
                    job_id: scratch.id().to_string(),
                    input_path: file_path.clone(),
                    output_path: scratch.unique_file("_trimmed.mp3"),
                    window,
                    bitrate_kbps: self.bitrate_kbps,
                })
                .await?;
            observe_stage(PipelineStage::Trimming, started);
            file_path = output.output_path;
        }

        // Tag
        if !request.metadata.is_empty() {
            info!(stage = %PipelineStage::Tagging, "Writing tags");
            let started = Instant::now();
            match self.tagger.write(&file_path, &request.metadata).await {
                Ok(report) => info!(frames = ?report.frames_written, "Tags written"),
                Err(e) => {
                    warn!(error = %e, "Tag write failed, delivering untagged audio");
                    metrics::TAG_WARNINGS.inc();
                    warnings.push(PipelineWarning::MetadataWriteFailed {
                        reason: e.to_string(),
                    });
                }
            }
            observe_stage(PipelineStage::Tagging, started);
        }

        Ok(StagesOutput {
            file_path,
            source_title: fetched.title,
            warnings,
        })
    }
}

fn observe_stage(stage: PipelineStage, started: Instant) {
    metrics::STAGE_DURATION
        .with_label_values(&[stage.as_str()])
        .observe(started.elapsed().as_secs_f64());
}

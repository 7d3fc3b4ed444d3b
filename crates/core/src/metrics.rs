//! Prometheus metrics for the conversion pipeline.
//!
//! This module provides metrics for:
//! - Conversion outcomes
//! - Per-stage durations (fetch, trim, tag)
//! - Tag write warnings

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Conversions total by result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tubetape_conversions_total", "Total conversion requests"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Stage duration in seconds.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tubetape_stage_duration_seconds",
            "Duration of each pipeline stage",
        )
        .buckets(vec![0.05, 0.25, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["stage"], // "fetching", "trimming", "tagging"
    )
    .unwrap()
});

/// Tag writes that failed and were downgraded to warnings.
pub static TAG_WARNINGS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "tubetape_tag_warnings_total",
        "Tag writes that failed without failing the request",
    )
    .unwrap()
});

/// Returns all core metrics for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(TAG_WARNINGS.clone()),
    ]
}

//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Video jobs (submissions, polls, outcomes)
//! - Artifact downloads
//! - LLM relay requests

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Video jobs
// =============================================================================

/// Pipeline runs by result.
pub static VIDEO_JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_video_jobs_total", "Total video generation runs"),
        &["result"], // "succeeded", "submission", "status", "job_failed", "timeout", "download", "busy"
    )
    .unwrap()
});

/// Duration of a pipeline run, submit to publish.
pub static VIDEO_JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pitwall_video_job_duration_seconds",
            "Duration of video generation runs",
        )
        .buckets(vec![5.0, 15.0, 30.0, 60.0, 120.0, 180.0, 300.0, 600.0]),
        &["result"],
    )
    .unwrap()
});

/// Status polls by observed status.
pub static VIDEO_STATUS_POLLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_video_status_polls_total", "Total job status polls"),
        &["status"], // "succeeded", "failed", "in_progress"
    )
    .unwrap()
});

// =============================================================================
// Downloads
// =============================================================================

/// Artifact downloads by result.
pub static DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_downloads_total", "Total artifact downloads"),
        &["result"], // "published", "failed"
    )
    .unwrap()
});

/// Bytes published.
pub static DOWNLOAD_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("pitwall_download_bytes_total", "Total bytes published").unwrap()
});

// =============================================================================
// LLM
// =============================================================================

/// LLM relay requests by result.
pub static LLM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_llm_requests_total", "Total LLM completion requests"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// Returns all core metrics for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(VIDEO_JOBS_TOTAL.clone()),
        Box::new(VIDEO_JOB_DURATION.clone()),
        Box::new(VIDEO_STATUS_POLLS.clone()),
        Box::new(DOWNLOADS_TOTAL.clone()),
        Box::new(DOWNLOAD_BYTES.clone()),
        Box::new(LLM_REQUESTS.clone()),
    ]
}

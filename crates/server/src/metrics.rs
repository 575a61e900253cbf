//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Pitwall server:
//! - HTTP request metrics (latency, counts, errors)
//! - Video generation and serving metrics
//! - Core metrics (jobs, polls, downloads, LLM) re-registered from `pitwall_core`

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pitwall_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 60.0, 300.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pitwall_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Video Metrics
// =============================================================================

/// Responses from `GET /video` by kind.
pub static VIDEO_RESPONSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pitwall_video_responses_total", "Video responses by kind"),
        &["kind"], // "full", "partial", "not_satisfiable", "not_found"
    )
    .unwrap()
});

/// Whether a generation run is in flight (1) or not (0). Collected on scrape.
pub static VIDEO_GENERATION_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pitwall_video_generation_running",
        "Whether a video generation run is in flight",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Video
    registry
        .register(Box::new(VIDEO_RESPONSES.clone()))
        .unwrap();
    registry
        .register(Box::new(VIDEO_GENERATION_RUNNING.clone()))
        .unwrap();

    // Core metrics (jobs, polls, downloads, LLM)
    for metric in pitwall_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    VIDEO_GENERATION_RUNNING.set(if state.pipeline().is_busy() { 1 } else { 0 });
}

/// Normalize a path for metric labels.
///
/// API and video routes keep their path with numeric segments replaced;
/// everything served by the static fallback collapses to `/{static}`.
pub fn normalize_path(path: &str) -> String {
    const ROUTES: [&str; 3] = ["/video", "/generate-video", "/metrics"];

    if !path.starts_with("/api/") && !ROUTES.contains(&path) {
        return "/{static}".to_string();
    }

    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

//! Error types for the video module.

use std::time::Duration;
use thiserror::Error;

use crate::storage::DownloadError;

/// Errors from the job submission and status endpoints.
#[derive(Debug, Error)]
pub enum VideoApiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("No job id returned by provider")]
    MissingJobId,

    #[error("JSON error: {0}")]
    Json(String),
}

/// Terminal failures of the job state machine.
#[derive(Debug, Error)]
pub enum PollError {
    /// The provider rejected the job or returned no identifier.
    #[error("job submission failed: {0}")]
    Submission(#[source] VideoApiError),

    /// A status poll could not be performed or decoded.
    #[error("status poll for job {job_id} failed: {source}")]
    Status {
        job_id: String,
        #[source]
        source: VideoApiError,
    },

    /// The provider reported the job as failed.
    #[error("video generation failed for job {job_id}: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// No terminal state within the wait budget.
    #[error("job {job_id} not finished after {waited:?} ({polls} polls)")]
    Timeout {
        job_id: String,
        waited: Duration,
        polls: u32,
    },
}

/// Errors surfaced by the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Another generation is already running for the single video slot.
    #[error("a video generation is already in progress")]
    Busy,

    /// The job never produced a downloadable generation.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// The job succeeded but the artifact could not be published.
    #[error("failed to download generation {generation_id}: {source}")]
    Download {
        generation_id: String,
        #[source]
        source: DownloadError,
    },
}

impl PipelineError {
    /// Stable tag for API responses and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::Poll(PollError::Submission(_)) => "submission",
            Self::Poll(PollError::Status { .. }) => "status",
            Self::Poll(PollError::JobFailed { .. }) => "job_failed",
            Self::Poll(PollError::Timeout { .. }) => "timeout",
            Self::Download { .. } => "download",
        }
    }

    /// Whether the caller, not the upstream, caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

//! Trait definitions for the video module.

use async_trait::async_trait;

use super::error::VideoApiError;
use super::types::{JobHandle, JobSpec, JobStatusReport};
use crate::storage::{ByteStream, DownloadError};

/// An asynchronous video generation provider.
#[async_trait]
pub trait VideoJobApi: Send + Sync {
    /// Provider name (e.g., "azure").
    fn provider(&self) -> &str;

    /// Creates a job and returns its identifier.
    async fn submit_job(&self, spec: &JobSpec) -> Result<JobHandle, VideoApiError>;

    /// Fetches the current status of a job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, VideoApiError>;

    /// Opens the content of a generation as a byte stream.
    ///
    /// A non-success response must fail here, before any byte is yielded.
    async fn open_generation(&self, generation_id: &str) -> Result<ByteStream, DownloadError>;
}

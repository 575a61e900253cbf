//! Mock video job API for testing.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::storage::{ByteStream, DownloadError};
use crate::video::{
    JobHandle, JobSpec, JobStatus, JobStatusReport, VideoApiError, VideoJobApi,
};

/// Mock implementation of the VideoJobApi trait.
///
/// Status reports are scripted: queued reports are returned in order, and
/// once the queue is empty every poll returns the default report
/// (`running` unless changed). Job ids are issued as `job-1`, `job-2`, ...
///
/// # Example
///
/// ```rust,ignore
/// use pitwall_core::testing::MockVideoJobApi;
///
/// let api = MockVideoJobApi::new();
/// api.push_status(JobStatusReport::new(JobStatus::parse("running"))).await;
/// api.push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1")).await;
/// api.set_content(vec![b"video bytes".to_vec()]).await;
/// ```
#[derive(Debug, Clone)]
pub struct MockVideoJobApi {
    statuses: Arc<RwLock<VecDeque<JobStatusReport>>>,
    default_status: Arc<RwLock<JobStatusReport>>,
    content: Arc<RwLock<Vec<Vec<u8>>>>,
    submitted: Arc<RwLock<Vec<JobSpec>>>,
    status_calls: Arc<RwLock<usize>>,
    opened: Arc<RwLock<Vec<String>>>,
    next_submit_error: Arc<RwLock<Option<VideoApiError>>>,
    next_status_error: Arc<RwLock<Option<VideoApiError>>>,
    next_download_error: Arc<RwLock<Option<DownloadError>>>,
    submit_delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockVideoJobApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVideoJobApi {
    pub fn new() -> Self {
        Self {
            statuses: Arc::new(RwLock::new(VecDeque::new())),
            default_status: Arc::new(RwLock::new(JobStatusReport::new(JobStatus::parse(
                "running",
            )))),
            content: Arc::new(RwLock::new(Vec::new())),
            submitted: Arc::new(RwLock::new(Vec::new())),
            status_calls: Arc::new(RwLock::new(0)),
            opened: Arc::new(RwLock::new(Vec::new())),
            next_submit_error: Arc::new(RwLock::new(None)),
            next_status_error: Arc::new(RwLock::new(None)),
            next_download_error: Arc::new(RwLock::new(None)),
            submit_delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Queue a status report for the next poll.
    pub async fn push_status(&self, report: JobStatusReport) {
        self.statuses.write().await.push_back(report);
    }

    /// Report returned once the queue is drained.
    pub async fn set_default_status(&self, report: JobStatusReport) {
        *self.default_status.write().await = report;
    }

    /// Chunks streamed by `open_generation`.
    pub async fn set_content(&self, chunks: Vec<Vec<u8>>) {
        *self.content.write().await = chunks;
    }

    /// Delay applied to every submission.
    pub async fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.write().await = Some(delay);
    }

    /// Configure the next submission to fail with the given error.
    pub async fn fail_next_submission(&self, error: VideoApiError) {
        *self.next_submit_error.write().await = Some(error);
    }

    /// Configure the next status poll to fail with the given error.
    pub async fn fail_next_status(&self, error: VideoApiError) {
        *self.next_status_error.write().await = Some(error);
    }

    /// Configure the next download to fail with the given error.
    pub async fn fail_next_download(&self, error: DownloadError) {
        *self.next_download_error.write().await = Some(error);
    }

    /// Specs received by `submit_job`, in order.
    pub async fn submitted_jobs(&self) -> Vec<JobSpec> {
        self.submitted.read().await.clone()
    }

    /// Number of status polls performed.
    pub async fn status_calls(&self) -> usize {
        *self.status_calls.read().await
    }

    /// Generation ids passed to `open_generation`, in order.
    pub async fn opened_generations(&self) -> Vec<String> {
        self.opened.read().await.clone()
    }
}

#[async_trait]
impl VideoJobApi for MockVideoJobApi {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn submit_job(&self, spec: &JobSpec) -> Result<JobHandle, VideoApiError> {
        let delay = *self.submit_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_submit_error.write().await.take() {
            return Err(err);
        }

        let mut submitted = self.submitted.write().await;
        submitted.push(spec.clone());
        Ok(JobHandle {
            id: format!("job-{}", submitted.len()),
        })
    }

    async fn job_status(&self, _job_id: &str) -> Result<JobStatusReport, VideoApiError> {
        *self.status_calls.write().await += 1;

        if let Some(err) = self.next_status_error.write().await.take() {
            return Err(err);
        }

        let next = self.statuses.write().await.pop_front();
        match next {
            Some(report) => Ok(report),
            None => Ok(self.default_status.read().await.clone()),
        }
    }

    async fn open_generation(&self, generation_id: &str) -> Result<ByteStream, DownloadError> {
        self.opened.write().await.push(generation_id.to_string());

        if let Some(err) = self.next_download_error.write().await.take() {
            return Err(err);
        }

        let chunks = self.content.read().await.clone();
        Ok(futures::stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed())
    }
}

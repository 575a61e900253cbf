//! Job state machine: submit, poll at a fixed cadence, extract the result.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::PollError;
use super::traits::VideoJobApi;
use super::types::{JobOutcome, JobSpec, JobStatus};
use crate::config::VideoConfig;
use crate::metrics::VIDEO_STATUS_POLLS;

/// Smallest interval honoured between polls.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Wait budget and cadence for polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl PollerConfig {
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }
}

impl From<&VideoConfig> for PollerConfig {
    fn from(config: &VideoConfig) -> Self {
        Self::new(config.max_wait(), config.poll_interval())
    }
}

/// Drives one job from submission to a terminal state.
///
/// Polling suspends the calling task between polls; it never blocks a thread.
pub struct JobPoller {
    api: Arc<dyn VideoJobApi>,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(api: Arc<dyn VideoJobApi>, config: PollerConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> PollerConfig {
        self.config
    }

    /// Submits `spec` and polls until the job succeeds, fails or times out.
    pub async fn run(&self, spec: &JobSpec) -> Result<JobOutcome, PollError> {
        let handle = self
            .api
            .submit_job(spec)
            .await
            .map_err(PollError::Submission)?;

        info!(
            job_id = %handle.id,
            provider = self.api.provider(),
            "Video job submitted"
        );

        self.poll(&handle.id).await
    }

    /// Polls an already submitted job.
    ///
    /// A `succeeded` status without generations is treated as still running.
    pub async fn poll(&self, job_id: &str) -> Result<JobOutcome, PollError> {
        let mut waited = Duration::ZERO;
        let mut polls = 0u32;

        while waited < self.config.max_wait {
            let report = self
                .api
                .job_status(job_id)
                .await
                .map_err(|e| PollError::Status {
                    job_id: job_id.to_string(),
                    source: e,
                })?;
            polls += 1;

            VIDEO_STATUS_POLLS
                .with_label_values(&[report.status.metric_label()])
                .inc();
            debug!(
                job_id,
                poll = polls,
                status = %report.status,
                payload = %report.raw,
                "Polled video job"
            );

            match report.status {
                JobStatus::Succeeded => {
                    if let Some(generation) = report.generations.first() {
                        info!(
                            job_id,
                            generation_id = %generation.id,
                            polls,
                            "Video job succeeded"
                        );
                        return Ok(JobOutcome {
                            job_id: job_id.to_string(),
                            generation_id: generation.id.clone(),
                            polls,
                        });
                    }
                    debug!(job_id, "Job succeeded but lists no generations yet");
                }
                JobStatus::Failed => {
                    let reason = report
                        .failure_reason
                        .unwrap_or_else(|| "provider reported failure".to_string());
                    warn!(job_id, reason = %reason, "Video job failed");
                    return Err(PollError::JobFailed {
                        job_id: job_id.to_string(),
                        reason,
                    });
                }
                JobStatus::InProgress(_) => {}
            }

            tokio::time::sleep(self.config.poll_interval).await;
            waited += self.config.poll_interval;
        }

        warn!(job_id, polls, waited = ?waited, "Video job timed out");
        Err(PollError::Timeout {
            job_id: job_id.to_string(),
            waited,
            polls,
        })
    }
}

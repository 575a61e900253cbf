//! End-to-end generation: submit, poll, download, publish.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::error::PipelineError;
use super::poller::{JobPoller, PollerConfig};
use super::traits::VideoJobApi;
use super::types::{JobSpec, JobTemplate, PublishedVideo};
use crate::metrics::{VIDEO_JOBS_TOTAL, VIDEO_JOB_DURATION};
use crate::prompt::video_prompt;
use crate::storage::AtomicFileWriter;

/// Generates a video and publishes it at a fixed path.
///
/// Only one run may be in flight: the published path is a single slot and a
/// second run would race the first on the temporary file.
pub struct VideoPipeline {
    api: Arc<dyn VideoJobApi>,
    poller: JobPoller,
    writer: AtomicFileWriter,
    destination: PathBuf,
    template: JobTemplate,
    in_flight: AtomicBool,
}

/// Releases the single video slot when a run ends, including on early return.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl VideoPipeline {
    pub fn new(
        api: Arc<dyn VideoJobApi>,
        poller_config: PollerConfig,
        writer: AtomicFileWriter,
        destination: impl Into<PathBuf>,
        template: JobTemplate,
    ) -> Self {
        Self {
            poller: JobPoller::new(Arc::clone(&api), poller_config),
            api,
            writer,
            destination: destination.into(),
            template,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether a run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Builds the prompt from `explanation` and runs the whole pipeline.
    pub async fn generate(&self, explanation: Option<&str>) -> Result<PublishedVideo, PipelineError> {
        let spec = self.template.spec(video_prompt(explanation));
        self.generate_with_spec(&spec).await
    }

    /// Runs the pipeline for an explicit job specification.
    pub async fn generate_with_spec(&self, spec: &JobSpec) -> Result<PublishedVideo, PipelineError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            VIDEO_JOBS_TOTAL.with_label_values(&["busy"]).inc();
            warn!("Rejecting video generation: another run is in progress");
            return Err(PipelineError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let start = Instant::now();
        let result = self.run(spec, start).await;
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(video) => {
                VIDEO_JOBS_TOTAL.with_label_values(&["succeeded"]).inc();
                VIDEO_JOB_DURATION
                    .with_label_values(&["succeeded"])
                    .observe(elapsed);
                info!(
                    job_id = %video.job_id,
                    generation_id = %video.generation_id,
                    size_bytes = video.size_bytes,
                    elapsed_ms = video.elapsed_ms,
                    "Video generated and published"
                );
            }
            Err(e) => {
                VIDEO_JOBS_TOTAL.with_label_values(&[e.kind()]).inc();
                VIDEO_JOB_DURATION
                    .with_label_values(&[e.kind()])
                    .observe(elapsed);
                error!(kind = e.kind(), error = %e, "Video generation failed");
            }
        }

        result
    }

    async fn run(&self, spec: &JobSpec, start: Instant) -> Result<PublishedVideo, PipelineError> {
        let outcome = self.poller.run(spec).await?;

        let stream = self
            .api
            .open_generation(&outcome.generation_id)
            .await
            .map_err(|e| PipelineError::Download {
                generation_id: outcome.generation_id.clone(),
                source: e,
            })?;

        let file = self
            .writer
            .materialize(stream, &self.destination)
            .await
            .map_err(|e| PipelineError::Download {
                generation_id: outcome.generation_id.clone(),
                source: e,
            })?;

        Ok(PublishedVideo {
            job_id: outcome.job_id,
            generation_id: outcome.generation_id,
            path: file.path,
            size_bytes: file.size_bytes,
            sha256: file.sha256,
            polls: outcome.polls,
            elapsed_ms: start.elapsed().as_millis() as u64,
            published_at: Utc::now(),
        })
    }
}

//! Video generation: job API client, poller and the publish pipeline.
//!
//! A run submits a job to the provider, polls it at a fixed cadence until it
//! reaches a terminal state, then streams the first generation into the
//! published video slot through [`crate::storage::AtomicFileWriter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pitwall_core::video::{AzureVideoClient, JobTemplate, PollerConfig, VideoPipeline};
//!
//! let api = Arc::new(AzureVideoClient::new(&config.video)?);
//! let pipeline = VideoPipeline::new(
//!     api,
//!     PollerConfig::from(&config.video),
//!     AtomicFileWriter::new(config.storage.chunk_size_bytes),
//!     &config.storage.video_path,
//!     JobTemplate::from(&config.video),
//! );
//!
//! let video = pipeline.generate(Some("Why do drivers draft?")).await?;
//! ```

mod azure;
mod error;
mod pipeline;
mod poller;
mod traits;
mod types;

pub use azure::AzureVideoClient;
pub use error::{PipelineError, PollError, VideoApiError};
pub use pipeline::VideoPipeline;
pub use poller::{JobPoller, PollerConfig};
pub use traits::VideoJobApi;
pub use types::{
    Generation, JobHandle, JobOutcome, JobSpec, JobStatus, JobStatusReport, JobTemplate,
    PublishedVideo,
};

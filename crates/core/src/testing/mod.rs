//! Testing utilities and mock implementations.
//!
//! Scripted stand-ins for the external services, so the pipeline and the
//! HTTP surface can be exercised without a provider account.
//!
//! # Example
//!
//! ```rust,ignore
//! use pitwall_core::testing::{MockLlmClient, MockVideoJobApi};
//!
//! let video_api = MockVideoJobApi::new();
//! let llm = MockLlmClient::new();
//!
//! video_api
//!     .push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1"))
//!     .await;
//! llm.set_reply("Drafting is riding in the slipstream.").await;
//!
//! // Use in AppState...
//! ```

mod mock_llm;
mod mock_video_api;

pub use mock_llm::MockLlmClient;
pub use mock_video_api::MockVideoJobApi;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::video::JobTemplate;

    /// Deterministic sample payload of `len` bytes.
    pub fn video_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    /// Job template with the provider's usual parameters.
    pub fn job_template() -> JobTemplate {
        JobTemplate {
            model: "sora".to_string(),
            height: 720,
            width: 1280,
            duration_seconds: 5,
            variant_count: 1,
        }
    }
}

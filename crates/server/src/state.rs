use std::sync::Arc;
use pitwall_core::{Config, LlmClient, RangeFileServer, SanitizedConfig, VideoPipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    llm: Arc<dyn LlmClient>,
    pipeline: Arc<VideoPipeline>,
    video: RangeFileServer,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LlmClient>, pipeline: Arc<VideoPipeline>) -> Self {
        // Reader and writer share one configured path.
        let video = RangeFileServer::new(pipeline.destination());
        Self {
            config,
            llm,
            pipeline,
            video,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn llm(&self) -> &dyn LlmClient {
        self.llm.as_ref()
    }

    pub fn pipeline(&self) -> &VideoPipeline {
        &self.pipeline
    }

    pub fn video(&self) -> &RangeFileServer {
        &self.video
    }
}

pub mod config;
pub mod llm;
pub mod metrics;
pub mod prompt;
pub mod range;
pub mod storage;
pub mod testing;
pub mod video;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LlmConfig,
    SanitizedConfig, ServerConfig, StorageConfig, VideoConfig,
};
pub use llm::{
    AzureOpenAiClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage,
};
pub use prompt::{tutor_prompt, video_prompt, TUTOR_ROLE};
pub use range::{parse_range, ByteRange, RangeRequest};
pub use storage::{AtomicFileWriter, DownloadError, MaterializedFile, RangeFileServer, VideoBody};
pub use video::{
    AzureVideoClient, JobPoller, JobSpec, JobStatus, JobStatusReport, JobTemplate,
    PipelineError, PollError, PollerConfig, PublishedVideo, VideoApiError, VideoJobApi,
    VideoPipeline,
};

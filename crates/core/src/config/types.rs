use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub video: VideoConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the landing page (index.html) and its assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Where the generated video lives on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Published video path. The in-progress download is a `.part` sibling.
    #[serde(default = "default_video_path")]
    pub video_path: PathBuf,
    /// Write buffer size used while streaming a download to disk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            video_path: default_video_path(),
            chunk_size_bytes: default_chunk_size(),
        }
    }
}

fn default_video_path() -> PathBuf {
    PathBuf::from("video.mp4")
}

fn default_chunk_size() -> usize {
    1024 * 1024 // 1 MiB
}

/// Chat-completion deployment used by the question endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    pub api_base: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
    #[serde(default = "default_llm_api_version")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u32,
    /// Overrides the built-in tutor instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_deployment() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_api_version() -> String {
    "2025-01-01-preview".to_string()
}

fn default_llm_timeout() -> u32 {
    120
}

/// Video generation provider and job parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoConfig {
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    pub api_base: String,
    #[serde(default = "default_video_api_version")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
    #[serde(default = "default_variant_count")]
    pub variant_count: u32,
    /// Upper bound on the time spent polling a job.
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
    /// Fixed delay between status polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Timeout for submit and status calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for the whole artifact download.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl VideoConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_video_api_version() -> String {
    "preview".to_string()
}

fn default_model() -> String {
    "sora".to_string()
}

fn default_height() -> u32 {
    720
}

fn default_width() -> u32 {
    1280
}

fn default_duration_seconds() -> u32 {
    5
}

fn default_variant_count() -> u32 {
    1
}

fn default_max_wait() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

fn default_download_timeout() -> u64 {
    300
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: SanitizedLlmConfig,
    pub video: SanitizedVideoConfig,
}

/// Sanitized LLM config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub api_base: String,
    pub deployment: String,
    pub api_version: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized video config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedVideoConfig {
    pub api_base: String,
    pub api_version: String,
    pub api_key_configured: bool,
    pub model: String,
    pub height: u32,
    pub width: u32,
    pub duration_seconds: u32,
    pub variant_count: u32,
    pub max_wait_secs: u64,
    pub poll_interval_secs: u64,
}

fn key_configured(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.is_empty())
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: config.storage.clone(),
            llm: SanitizedLlmConfig {
                api_base: config.llm.api_base.clone(),
                deployment: config.llm.deployment.clone(),
                api_version: config.llm.api_version.clone(),
                api_key_configured: key_configured(&config.llm.api_key),
                timeout_secs: config.llm.timeout_secs,
            },
            video: SanitizedVideoConfig {
                api_base: config.video.api_base.clone(),
                api_version: config.video.api_version.clone(),
                api_key_configured: key_configured(&config.video.api_key),
                model: config.video.model.clone(),
                height: config.video.height,
                width: config.video.width,
                duration_seconds: config.video.duration_seconds,
                variant_count: config.video.variant_count,
                max_wait_secs: config.video.max_wait_secs,
                poll_interval_secs: config.video.poll_interval_secs,
            },
        }
    }
}

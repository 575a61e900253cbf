//! Azure OpenAI video generation backend.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::VideoApiError;
use super::traits::VideoJobApi;
use super::types::{Generation, JobHandle, JobSpec, JobStatus, JobStatusReport};
use crate::config::VideoConfig;
use crate::storage::{ByteStream, DownloadError};

/// Longest upstream error body kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the `/openai/v1/video/generations` job API.
pub struct AzureVideoClient {
    client: Client,
    download_client: Client,
    api_base: String,
    api_version: String,
    api_key: Option<String>,
}

impl AzureVideoClient {
    /// Create a client from the video configuration.
    pub fn new(config: &VideoConfig) -> Result<Self, VideoApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VideoApiError::Http(e.to_string()))?;

        let download_client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()
            .map_err(|e| VideoApiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            download_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn jobs_url(&self) -> String {
        format!(
            "{}/openai/v1/video/generations/jobs?api-version={}",
            self.api_base,
            urlencoding::encode(&self.api_version)
        )
    }

    fn job_url(&self, job_id: &str) -> String {
        format!(
            "{}/openai/v1/video/generations/jobs/{}?api-version={}",
            self.api_base,
            urlencoding::encode(job_id),
            urlencoding::encode(&self.api_version)
        )
    }

    fn content_url(&self, generation_id: &str) -> String {
        format!(
            "{}/openai/v1/video/generations/{}/content/video?api-version={}",
            self.api_base,
            urlencoding::encode(generation_id),
            urlencoding::encode(&self.api_version)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }
}

async fn error_body(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[derive(Debug, Serialize)]
struct CreateJobRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    height: u32,
    width: u32,
    n_seconds: u32,
    n_variants: u32,
}

impl<'a> From<&'a JobSpec> for CreateJobRequest<'a> {
    fn from(spec: &'a JobSpec) -> Self {
        Self {
            model: &spec.model,
            prompt: &spec.prompt,
            height: spec.height,
            width: spec.width,
            n_seconds: spec.duration_seconds,
            n_variants: spec.variant_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateJobResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    generations: Option<Vec<GenerationResponse>>,
    #[serde(default)]
    failure_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    id: String,
}

#[async_trait]
impl VideoJobApi for AzureVideoClient {
    fn provider(&self) -> &str {
        "azure"
    }

    async fn submit_job(&self, spec: &JobSpec) -> Result<JobHandle, VideoApiError> {
        let response = self
            .authorize(self.client.post(self.jobs_url()))
            .json(&CreateJobRequest::from(spec))
            .send()
            .await
            .map_err(|e| VideoApiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VideoApiError::Upstream {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body: CreateJobResponse = response
            .json()
            .await
            .map_err(|e| VideoApiError::Json(e.to_string()))?;

        match body.id {
            Some(id) if !id.is_empty() => Ok(JobHandle { id }),
            _ => Err(VideoApiError::MissingJobId),
        }
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, VideoApiError> {
        let response = self
            .authorize(self.client.get(self.job_url(job_id)))
            .send()
            .await
            .map_err(|e| VideoApiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VideoApiError::Upstream {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VideoApiError::Json(e.to_string()))?;
        let parsed: JobStatusResponse = serde_json::from_value(raw.clone())
            .map_err(|e| VideoApiError::Json(format!("{}: {}", e, raw)))?;

        Ok(JobStatusReport {
            status: JobStatus::parse(&parsed.status),
            generations: parsed
                .generations
                .unwrap_or_default()
                .into_iter()
                .map(|g| Generation { id: g.id })
                .collect(),
            failure_reason: parsed.failure_reason,
            raw,
        })
    }

    async fn open_generation(&self, generation_id: &str) -> Result<ByteStream, DownloadError> {
        let url = self.content_url(generation_id);
        debug!(generation_id, "Opening generation content");

        let response = self
            .authorize(self.download_client.get(&url))
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Upstream {
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| DownloadError::Transport(e.to_string())))
            .boxed())
    }
}

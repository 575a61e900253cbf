//! Types for the video generation module.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::config::VideoConfig;

/// Parameters of a generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSpec {
    pub model: String,
    pub prompt: String,
    pub height: u32,
    pub width: u32,
    pub duration_seconds: u32,
    pub variant_count: u32,
}

/// Fixed job parameters; only the prompt changes between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTemplate {
    pub model: String,
    pub height: u32,
    pub width: u32,
    pub duration_seconds: u32,
    pub variant_count: u32,
}

impl JobTemplate {
    pub fn spec(&self, prompt: impl Into<String>) -> JobSpec {
        JobSpec {
            model: self.model.clone(),
            prompt: prompt.into(),
            height: self.height,
            width: self.width,
            duration_seconds: self.duration_seconds,
            variant_count: self.variant_count,
        }
    }
}

impl From<&VideoConfig> for JobTemplate {
    fn from(config: &VideoConfig) -> Self {
        Self {
            model: config.model.clone(),
            height: config.height,
            width: config.width,
            duration_seconds: config.duration_seconds,
            variant_count: config.variant_count,
        }
    }
}

/// Handle returned when a job is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
}

/// Provider-reported job status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Failed,
    /// Any non-terminal status (`queued`, `running`, `preprocessing`, ...).
    InProgress(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "" => Self::InProgress("unknown".to_string()),
            other => Self::InProgress(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::InProgress(s) => s,
        }
    }

    /// Bounded label for metrics; provider-specific progress states collapse.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::InProgress(_) => "in_progress",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A produced artifact of a succeeded job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub id: String,
}

/// One status poll result.
#[derive(Debug, Clone)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub generations: Vec<Generation>,
    pub failure_reason: Option<String>,
    /// Raw payload, kept for diagnostics.
    pub raw: serde_json::Value,
}

impl JobStatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            generations: Vec::new(),
            failure_reason: None,
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_generation(mut self, id: impl Into<String>) -> Self {
        self.generations.push(Generation { id: id.into() });
        self
    }

    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }
}

/// Result of polling a job to success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job_id: String,
    pub generation_id: String,
    pub polls: u32,
}

/// A generated video that has been published locally.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedVideo {
    pub job_id: String,
    pub generation_id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
    pub polls: u32,
    pub elapsed_ms: u64,
    pub published_at: DateTime<Utc>,
}

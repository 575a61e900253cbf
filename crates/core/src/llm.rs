//! LLM client abstraction and the Azure OpenAI chat implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::metrics::LLM_REQUESTS;

/// Error type for LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Not configured: llm.api_key is not set")]
    NotConfigured,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Request for a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message (role of the model)
    pub system: Option<String>,
    /// User message
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
    /// Token usage
    pub usage: LlmUsage,
    /// Model reported by the provider
    pub model: String,
}

/// Trait for LLM clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name (e.g., "azure")
    fn provider(&self) -> &str;

    /// Model or deployment name
    fn model(&self) -> &str;

    /// Send a completion request and get a text response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

// ============================================================================
// Azure OpenAI Implementation
// ============================================================================

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    api_base: String,
    deployment: String,
    api_version: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AzureOpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(u64::from(config.timeout_secs));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            timeout,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.api_base,
            urlencoding::encode(&self.deployment),
            urlencoding::encode(&self.api_version)
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AzureOpenAiClient {
    async fn send(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        // Requests without a key are always rejected upstream.
        let Some(key) = &self.api_key else {
            return Err(LlmError::NotConfigured);
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });

        let chat_request = ChatRequest { messages };

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", key)
            .json(&chat_request)
            .send()
            .await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::Http(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api { status, message });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Json(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Json("response has no choices".to_string()))?;

        // Some deployments return structured content; relay it as text.
        let text = match content {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        let usage = chat_response
            .usage
            .map(|u| LlmUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            usage,
            model: chat_response
                .model
                .unwrap_or_else(|| self.deployment.clone()),
        })
    }
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    fn provider(&self) -> &str {
        "azure"
    }

    fn model(&self) -> &str {
        &self.deployment
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let result = self.send(request).await;
        match &result {
            Ok(response) => {
                LLM_REQUESTS.with_label_values(&["success"]).inc();
                debug!(
                    deployment = %self.deployment,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Chat completion received"
                );
            }
            Err(e) => {
                LLM_REQUESTS.with_label_values(&["error"]).inc();
                warn!(deployment = %self.deployment, error = %e, "Chat completion failed");
            }
        }
        result
    }
}

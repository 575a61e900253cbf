//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Answers every request with a fixed reply and records the requests it saw.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    reply: Arc<RwLock<String>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
    next_error: Arc<RwLock<Option<LlmError>>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            reply: Arc::new(RwLock::new("mock answer".to_string())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the text returned for subsequent requests.
    pub async fn set_reply(&self, reply: impl Into<String>) {
        *self.reply.write().await = reply.into();
    }

    /// Configure the next request to fail with the given error.
    pub async fn set_next_error(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.write().await.push(request);

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(CompletionResponse {
            text: self.reply.read().await.clone(),
            usage: LlmUsage::default(),
            model: "mock-model".to_string(),
        })
    }
}

//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock providers injected and the published video in a temporary
//! directory, so every endpoint can be exercised without a provider account.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pitwall_core::testing::{MockLlmClient, MockVideoJobApi};
use pitwall_core::{
    load_config_from_str, AtomicFileWriter, JobTemplate, LlmClient, PollerConfig, VideoJobApi,
    VideoPipeline,
};

/// Re-export fixtures for test convenience
pub use pitwall_core::testing::fixtures;

/// Test fixture with mock providers.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_video_missing() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.get_raw("/video", &[]).await;
///     assert_eq!(response.status, 404);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock video provider - script job statuses and content
    pub video_api: Arc<MockVideoJobApi>,
    /// Mock chat model - configure replies
    pub llm: Arc<MockLlmClient>,
    /// Where the pipeline publishes and `/video` reads
    pub video_path: PathBuf,
    /// Temporary directory for the video and static files
    pub temp_dir: TempDir,
}

/// JSON response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Raw response, for binary bodies and header assertions
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let video_path = temp_dir.path().join("media").join("video.mp4");
        let static_dir = temp_dir.path().join("static");
        std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), "<html>pitwall</html>")
            .expect("Failed to write index.html");

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"
port = 8080
static_dir = '{}'

[storage]
video_path = '{}'

[llm]
api_base = "https://llm.invalid"
api_key = "llm-secret"
{}

[video]
api_base = "https://video.invalid"
api_key = "video-secret"
"#,
            static_dir.display(),
            video_path.display(),
            test_config
                .system_prompt
                .as_ref()
                .map(|p| format!("system_prompt = '{}'", p))
                .unwrap_or_default(),
        ))
        .expect("Failed to parse test config");

        let video_api = Arc::new(MockVideoJobApi::new());
        let llm = Arc::new(MockLlmClient::new());

        let pipeline = Arc::new(VideoPipeline::new(
            Arc::clone(&video_api) as Arc<dyn VideoJobApi>,
            PollerConfig::new(test_config.max_wait, Duration::from_millis(5)),
            AtomicFileWriter::new(16),
            video_path.clone(),
            JobTemplate::from(&config.video),
        ));

        let state = Arc::new(pitwall_server::state::AppState::new(
            config,
            Arc::clone(&llm) as Arc<dyn LlmClient>,
            pipeline,
        ));

        let router = pitwall_server::api::create_router(state);

        Self {
            router,
            video_api,
            llm,
            video_path,
            temp_dir,
        }
    }

    /// Publish a video directly, bypassing the pipeline.
    pub async fn write_video(&self, data: &[u8]) {
        if let Some(parent) = self.video_path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(&self.video_path, data).await.unwrap();
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        Self::into_json(self.send(request).await)
    }

    /// Send a GET request with extra headers and keep the raw body.
    pub async fn get_raw(&self, path: &str, headers: &[(&str, &str)]) -> RawResponse {
        let mut builder = Request::builder().method("GET").uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Send a GET request with a header value that need not be valid UTF-8.
    pub async fn get_raw_header_bytes(&self, path: &str, name: &str, value: &[u8]) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(name, HeaderValue::from_bytes(value).unwrap())
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        Self::into_json(self.send(request_builder.body(body).unwrap()).await)
    }

    async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        RawResponse {
            status,
            headers,
            body,
        }
    }

    fn into_json(response: RawResponse) -> TestResponse {
        let body: Value = if response.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&response.body).unwrap_or(Value::Null)
        };

        TestResponse {
            status: response.status,
            body,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wait budget for the job poller
    pub max_wait: Duration,
    /// Overrides the tutor instructions
    pub system_prompt: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_millis(500),
            system_prompt: None,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

//! In-process tests for the JSON API: health, config, LLM relay and generation.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{TestConfig, TestFixture};
use pitwall_core::{
    DownloadError, JobStatus, JobStatusReport, LlmError, VideoApiError, TUTOR_ROLE,
};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_hides_keys() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);

    assert_eq!(response.body["llm"]["api_key_configured"], true);
    assert_eq!(response.body["video"]["api_key_configured"], true);
    assert!(response.body["llm"].get("api_key").is_none());

    let text = response.body.to_string();
    assert!(!text.contains("llm-secret"));
    assert!(!text.contains("video-secret"));
}

#[tokio::test]
async fn test_static_index_served() {
    let fixture = TestFixture::new().await;
    let response = fixture.get_raw("/", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_ref(), b"<html>pitwall</html>");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let response = fixture.get_raw("/metrics", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.body.to_vec()).unwrap();
    assert!(text.contains("pitwall_http_requests_total"));
    assert!(text.contains("pitwall_video_generation_running"));
}

// ============================================================================
// LLM relay
// ============================================================================

#[tokio::test]
async fn test_llm_relays_answer() {
    let fixture = TestFixture::new().await;
    fixture.llm.set_reply("Drafting means tucking in behind another car.").await;

    let response = fixture
        .post("/api/v1/llm", json!({ "question": "What is drafting?" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body["result"],
        "Drafting means tucking in behind another car."
    );

    let requests = fixture.llm.recorded_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system.as_deref(), Some(TUTOR_ROLE));
    assert!(requests[0].prompt.ends_with("What is drafting?"));
    assert!(requests[0].prompt.len() > "What is drafting?".len());
}

#[tokio::test]
async fn test_llm_custom_instructions() {
    let fixture = TestFixture::with_config(TestConfig {
        system_prompt: Some("Answer in one line. ".to_string()),
        ..Default::default()
    })
    .await;

    fixture
        .post("/api/v1/llm", json!({ "question": "Why pit?" }))
        .await;

    let requests = fixture.llm.recorded_requests().await;
    assert_eq!(requests[0].prompt, "Answer in one line. Why pit?");
}

#[tokio::test]
async fn test_llm_empty_question_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture.post("/api/v1/llm", json!({ "question": "   " })).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "invalid_request");
    assert!(fixture.llm.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_llm_missing_question_field() {
    let fixture = TestFixture::new().await;
    let response = fixture.post("/api/v1/llm", json!({})).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "invalid_request");
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("question"));
    assert!(fixture.llm.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_llm_malformed_body() {
    let fixture = TestFixture::new().await;
    for body in ["not json", ""] {
        let response = fixture.post_raw("/api/v1/llm", body).await;
        assert_status!(response, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["kind"], "invalid_request");
        assert!(response.body["error"].is_string());
    }
    assert!(fixture.llm.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_llm_not_configured() {
    let fixture = TestFixture::new().await;
    fixture.llm.set_next_error(LlmError::NotConfigured).await;

    let response = fixture
        .post("/api/v1/llm", json!({ "question": "What is a restrictor plate?" }))
        .await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["kind"], "llm");
}

#[tokio::test]
async fn test_llm_upstream_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .llm
        .set_next_error(LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        })
        .await;

    let response = fixture
        .post("/api/v1/llm", json!({ "question": "What is a pit window?" }))
        .await;
    assert_status!(response, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["kind"], "llm");
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("rate limited"));
}

// ============================================================================
// Video generation
// ============================================================================

#[tokio::test]
async fn test_generate_publishes_and_serves() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::parse("running")))
        .await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-42"))
        .await;
    fixture
        .video_api
        .set_content(vec![b"fake-".to_vec(), b"mp4-".to_vec(), b"data".to_vec()])
        .await;

    let response = fixture
        .post(
            "/api/v1/video/generate",
            json!({ "explanation": "Fresh tires grip better." }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    assert_eq!(response.body["video"]["generation_id"], "gen-42");
    assert_eq!(response.body["video"]["size_bytes"], 13);
    assert_eq!(response.body["video"]["polls"], 2);

    let submitted = fixture.video_api.submitted_jobs().await;
    assert!(submitted[0].prompt.ends_with("Fresh tires grip better."));
    assert_eq!(submitted[0].model, "sora");

    let video = fixture.get_raw("/video", &[("Range", "bytes=5-8")]).await;
    assert_eq!(video.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(video.body.as_ref(), b"mp4-");
    assert_eq!(video.header("content-range"), Some("bytes 5-8/13"));
}

#[tokio::test]
async fn test_generate_get_uses_default_explanation() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1"))
        .await;
    fixture.video_api.set_content(vec![b"clip".to_vec()]).await;

    let response = fixture.get("/generate-video").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["message"], "Video generated and ready");

    let submitted = fixture.video_api.submitted_jobs().await;
    assert!(submitted[0]
        .prompt
        .ends_with(pitwall_core::prompt::DEFAULT_EXPLANATION));
}

#[tokio::test]
async fn test_generate_empty_body_accepted() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1"))
        .await;

    let response = fixture.post_raw("/api/v1/video/generate", "").await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_generate_malformed_body() {
    let fixture = TestFixture::new().await;
    let response = fixture.post_raw("/api/v1/video/generate", "{not json").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "invalid_request");
    assert!(fixture.video_api.submitted_jobs().await.is_empty());
}

#[tokio::test]
async fn test_generate_job_failed() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::Failed).with_failure_reason("blocked"))
        .await;

    let response = fixture.get("/generate-video").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "job_failed");
    assert!(fixture.video_api.opened_generations().await.is_empty());
}

#[tokio::test]
async fn test_generate_submission_rejected() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .fail_next_submission(VideoApiError::Upstream {
            status: 400,
            body: "invalid prompt".to_string(),
        })
        .await;

    let response = fixture.get("/generate-video").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "submission");
}

#[tokio::test]
async fn test_generate_timeout() {
    let fixture = TestFixture::with_config(TestConfig {
        max_wait: Duration::from_millis(30),
        ..Default::default()
    })
    .await;

    let response = fixture.get("/generate-video").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "timeout");
}

#[tokio::test]
async fn test_generate_download_failure_keeps_old_video() {
    let fixture = TestFixture::new().await;
    fixture.write_video(b"previous video").await;
    fixture
        .video_api
        .push_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1"))
        .await;
    fixture
        .video_api
        .fail_next_download(DownloadError::Upstream {
            status: 404,
            message: "gone".to_string(),
        })
        .await;

    let response = fixture.get("/generate-video").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["kind"], "download");

    let video = fixture.get_raw("/video", &[]).await;
    assert_eq!(video.status, StatusCode::OK);
    assert_eq!(video.body.as_ref(), b"previous video");
}

#[tokio::test]
async fn test_concurrent_generate_conflict() {
    let fixture = TestFixture::new().await;
    fixture
        .video_api
        .set_submit_delay(Duration::from_millis(200))
        .await;
    fixture
        .video_api
        .set_default_status(JobStatusReport::new(JobStatus::Succeeded).with_generation("gen-1"))
        .await;

    let router = fixture.router.clone();
    let first = tokio::spawn(async move {
        use tower::ServiceExt;
        let request = axum::http::Request::builder()
            .uri("/generate-video")
            .body(axum::body::Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    });

    // Let the first request claim the slot.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = fixture.get("/generate-video").await;
    assert_status!(second, StatusCode::CONFLICT);
    assert_eq!(second.body["kind"], "busy");

    assert_eq!(first.await.unwrap(), StatusCode::OK);
}

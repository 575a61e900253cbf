//! Video generation trigger and range-aware video serving.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};
use pitwall_core::{PublishedVideo, VideoBody};

use super::handlers::{ApiError, ErrorResponse};
use crate::metrics::VIDEO_RESPONSES;
use crate::state::AppState;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Text the video should illustrate, typically a previous LLM answer.
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub message: String,
    pub video: PublishedVideo,
}

/// POST /api/v1/video/generate
///
/// The body is optional; an empty body uses the built-in explanation.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request: GenerateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("invalid_request", e)),
            )
        })?
    };

    run_generation(&state, request.explanation.as_deref()).await
}

/// GET /generate-video
pub async fn generate_default(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenerateResponse>, ApiError> {
    run_generation(&state, None).await
}

async fn run_generation(
    state: &AppState,
    explanation: Option<&str>,
) -> Result<Json<GenerateResponse>, ApiError> {
    match state.pipeline().generate(explanation).await {
        Ok(video) => Ok(Json(GenerateResponse {
            status: "success",
            message: "Video generated and ready".to_string(),
            video,
        })),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            Err((status, Json(ErrorResponse::new(e.kind(), e))))
        }
    }
}

/// Header bytes as Latin-1 text. Opaque bytes stay in the value, so a
/// present but undecodable `Range` is rejected by the parser instead of
/// being mistaken for an absent one.
fn decode_header(value: &HeaderValue) -> Cow<'_, str> {
    match value.to_str() {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(value.as_bytes().iter().map(|&b| char::from(b)).collect()),
    }
}

/// GET /video
///
/// Honours a single `Range: bytes=start-end` header. The size is read from
/// the file on every request, since a new video may be published at any time.
pub async fn serve(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let range = headers.get(header::RANGE).map(decode_header);
    let range = range.as_deref();

    let body = match state.video().open(range).await {
        Ok(body) => body,
        Err(e) => {
            error!(path = %state.video().path().display(), error = %e, "Failed to open video");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match body {
        VideoBody::NotFound => {
            VIDEO_RESPONSES.with_label_values(&["not_found"]).inc();
            StatusCode::NOT_FOUND.into_response()
        }
        VideoBody::NotSatisfiable { file_size } => {
            VIDEO_RESPONSES.with_label_values(&["not_satisfiable"]).inc();
            debug!(range, file_size, "Range not satisfiable");
            (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                    (header::CONTENT_RANGE, format!("bytes */{}", file_size)),
                ],
            )
                .into_response()
        }
        VideoBody::Full { body, file_size } => {
            VIDEO_RESPONSES.with_label_values(&["full"]).inc();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                    (header::CONTENT_LENGTH, file_size.to_string()),
                ],
                Body::from_stream(ReaderStream::new(body)),
            )
                .into_response()
        }
        VideoBody::Partial {
            body,
            range,
            file_size,
        } => {
            VIDEO_RESPONSES.with_label_values(&["partial"]).inc();
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                    (header::CONTENT_LENGTH, range.len().to_string()),
                    (header::CONTENT_RANGE, range.content_range(file_size)),
                ],
                Body::from_stream(ReaderStream::new(body)),
            )
                .into_response()
        }
    }
}

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use pitwall_core::SanitizedConfig;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// JSON body of every API error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable snake_case tag for programmatic handling.
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            kind: kind.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

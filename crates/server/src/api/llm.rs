//! Question relay to the chat model.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use pitwall_core::{tutor_prompt, CompletionRequest, LlmError, TUTOR_ROLE};

use super::handlers::{ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub result: String,
}

/// POST /api/v1/llm
///
/// Wraps the question in the tutor instructions and relays the answer.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AskResponse>, ApiError> {
    let body: AskRequest = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid_request", e)),
        )
    })?;

    if body.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid_request", "question must not be empty")),
        ));
    }

    let instructions = state.config().llm.system_prompt.as_deref();
    let request =
        CompletionRequest::new(tutor_prompt(instructions, &body.question)).with_system(TUTOR_ROLE);

    match state.llm().complete(request).await {
        Ok(response) => Ok(Json(AskResponse {
            result: response.text,
        })),
        Err(e) => {
            let status = match e {
                LlmError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                LlmError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err((status, Json(ErrorResponse::new("llm", e))))
        }
    }
}

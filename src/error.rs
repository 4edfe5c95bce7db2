use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Failures talking to the text-completion oracle.
///
/// These never reach an HTTP caller: every call site swaps them for its own
/// deterministic fallback.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse LLM JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("LLM response had no message content")]
    MissingContent,
}

/// Why an oracle-phrased question could not be built.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("malformed question payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Store(e) => tracing::error!(error = %e, "session store failure"),
            ApiError::SessionNotFound(sid) => tracing::debug!(session_id = %sid, "unknown session"),
            ApiError::BadRequest(msg) => tracing::debug!(detail = %msg, "bad request"),
        }
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

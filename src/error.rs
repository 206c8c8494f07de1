// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure of one stage of the chat pipeline. Never shown to the caller;
/// the orchestrator turns it into a localized reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("retrieval index failed: {0}")]
    Retrieval(String),

    #[error("scraper failed: {0}")]
    Scrape(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}: {snippet}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        snippet: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("concurrency limiter closed")]
    LimiterClosed,
}

/// Failures that abort startup. Never rendered as an HTTP response.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] ChatError),
}

/// Request-level errors returned by handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Cut a response body down to something safe to log.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 300;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

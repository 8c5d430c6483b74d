//! Error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure of a single upstream provider call.
///
/// These never leave the aggregator: each one is turned into a failure
/// result for the provider that raised it.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to {0}")]
    Connect(String),

    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }

    /// Classify a transport error the same way for every provider.
    pub fn from_transport(err: reqwest::Error, base_url: &str, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_seconds)
        } else if err.is_connect() {
            ProviderError::Connect(base_url.to_string())
        } else {
            ProviderError::Http(err)
        }
    }
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session closed: {0}")]
    SessionClosed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::SessionClosed(_) => StatusCode::GONE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

//! Relational API error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by [`super::ApiClient`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request never got a response
    #[error("HTTP error: {0}")]
    Http(String),
    /// Server answered with a non-2xx status
    #[error("{message} (HTTP {status})")]
    Server {
        status: u16,
        message: String,
        /// Raw response body, kept for logging
        body: String,
    },
    /// 2xx response with an unexpected body
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Builds a server error, preferring the body's `{message}` over `fallback`.
    pub fn from_response_body(status: u16, body: String, fallback: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        ApiError::Server {
            status,
            message,
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

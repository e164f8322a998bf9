//! Client error types.
//!
//! Nothing is retried internally; every error reaches the caller as-is.

use crate::config::ConfigError;
use thiserror::Error;

/// Maximum length for a response body carried in an error.
pub const MAX_ERROR_BODY_LEN: usize = 256;

/// Errors returned by API and session operations.
#[derive(Debug, Error)]
pub enum BbbError {
    /// Malformed base URL or other construction-time problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network failure, including timeouts.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Response body is not well-formed UTF-8 XML.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed response missing an expected field.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl BbbError {
    /// Whether the error came from the HTTP round trip itself
    /// (network failure or non-success status).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RequestFailed { .. })
    }
}

/// Truncate a response body to [`MAX_ERROR_BODY_LEN`] bytes on a char boundary.
pub(crate) fn truncate_error_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", body.get(..end).unwrap_or_default())
}

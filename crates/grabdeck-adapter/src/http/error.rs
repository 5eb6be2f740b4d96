/*
[INPUT]:  Error sources (HTTP transport, service replies, serialization, configuration)
[OUTPUT]: Structured error types with user-facing messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the download service adapter
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if the failure happened in transport rather than in the service
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }

    /// Check if the service reported an unknown task or path
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { code: 404, .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        ClientError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    /// Short message suitable for a notification.
    ///
    /// Service errors carry their own wording; everything else falls back to
    /// the full display string.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Http(err) if err.is_timeout() => "request timed out".to_string(),
            ClientError::Http(err) if err.is_connect() => "cannot reach download service".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, ClientError>;

//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when talking to the store API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never got a response (DNS, refused connection, reset).
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be read.
    #[error("Failed to parse response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    /// The request body could not be encoded.
    #[error("JSON error: {0}")]
    Encode(String),
}

impl FetchError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } | FetchError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Connect(_) | FetchError::Timeout)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Encode(e.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::InvalidUrl(e.to_string())
    }
}

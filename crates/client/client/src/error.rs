//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error type for bot API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// The API answered with a non-2xx status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The API answered 2xx but the body reports an error.
    #[error("Application error ({code}): {message}")]
    Application { code: String, message: String },

    /// The response body is not the expected JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    /// The client or request could not be built.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidJson(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_builder() {
            ClientError::Config(err.to_string())
        } else if err.is_decode() {
            ClientError::InvalidJson(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

//! Error types for the workflow persistence API.

use thiserror::Error;

/// Errors that can occur while talking to the workflow API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The workflow does not exist (404).
    #[error("Workflow not found: {0}")]
    NotFound(String),

    /// The server rejected the bearer credential (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The identity provider could not supply a credential.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Any other non-success response.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

//! Client error types.

use thiserror::Error;

/// Errors raised while asking a server for updates.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The body was neither empty nor JSON.
    #[error("Bad response: {0}")]
    BadResponse(#[from] serde_json::Error),
}

/// Convenience Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

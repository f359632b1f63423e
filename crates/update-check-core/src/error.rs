//! Error types for update checks.

use thiserror::Error;

/// Main error type for update check operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A required query parameter was not supplied.
    #[error("Missing query parameter: {name}")]
    MissingParameter { name: &'static str },

    /// The requested platform has no expected value configured.
    #[error("Unknown platform: {platform}")]
    UnknownPlatform { platform: String },

    /// The configuration file lacks a key the check needs.
    #[error("Missing configuration key: {key}")]
    MissingConfigKey { key: &'static str },

    /// The configuration file could not be read.
    #[error("Failed to read configuration {path}: {message}")]
    ConfigRead { path: String, message: String },

    /// The configuration file is not a valid document.
    #[error("Failed to parse configuration {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Resolving the commit history of the release failed.
    #[error("Ancestry resolution failed: {0}")]
    Ancestry(String),
}

impl CheckError {
    /// Returns true if the error was caused by the request or by a
    /// configuration that does not cover it, rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CheckError::MissingParameter { .. }
                | CheckError::UnknownPlatform { .. }
                | CheckError::MissingConfigKey { .. }
        )
    }
}

/// Convenience Result type for update check operations.
pub type Result<T> = std::result::Result<T, CheckError>;

impl From<serde_yaml::Error> for CheckError {
    fn from(err: serde_yaml::Error) -> Self {
        CheckError::ConfigParse {
            path: "<inline>".to_string(),
            message: err.to_string(),
        }
    }
}

/// Error types for the dayframe client core
///
/// Failures fall into two user-facing classes: validation errors raised
/// locally before any remote call, and remote operation failures surfaced
/// once with the backend's description and never retried automatically.
/// Best-effort paths (row image loads, reverse geocoding, reminder
/// delivery) do not produce values of this type; they log and leave their
/// slot empty.
use thiserror::Error;

/// Result type for dayframe operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input was missing or malformed; no remote call was made
    #[error("validation error: {0}")]
    Validation(String),

    /// The session is missing, expired, or was rejected by the backend
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found on the remote store
    #[error("not found: {0}")]
    NotFound(String),

    /// A query, save, login, or logout against the remote store failed
    #[error("remote operation failed: {0}")]
    Remote(String),

    /// A remote payload could not be decoded into a domain entity
    #[error("decode error: {0}")]
    Decode(String),

    /// The picked image could not be decoded or re-encoded
    #[error("media error: {0}")]
    Media(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Remote(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Media(err.to_string())
    }
}

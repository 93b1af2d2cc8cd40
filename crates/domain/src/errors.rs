//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Topic key is empty or malformed after normalization
    #[error("Invalid topic key: {0}")]
    InvalidTopicKey(String),

    /// Unknown verbosity profile name
    #[error("Invalid verbosity profile: {0}")]
    InvalidProfile(String),

    /// Unknown audio format name
    #[error("Invalid audio format: {0}")]
    InvalidAudioFormat(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

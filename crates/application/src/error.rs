//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Script generation failed (upstream error, timeout or empty payload)
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Speech synthesis failed (upstream error, timeout or empty payload)
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Content store read or write failed
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GenerationFailed(_) | Self::SynthesisFailed(_) | Self::PersistenceFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::InvalidTopicKey("empty".to_string()).into();
        assert_eq!(err.to_string(), DomainError::InvalidTopicKey("empty".to_string()).to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn upstream_failures_are_retryable() {
        assert!(ApplicationError::GenerationFailed("x".into()).is_retryable());
        assert!(ApplicationError::SynthesisFailed("x".into()).is_retryable());
        assert!(!ApplicationError::Configuration("x".into()).is_retryable());
    }

    #[test]
    fn messages_name_the_stage() {
        assert_eq!(
            ApplicationError::PersistenceFailed("disk full".into()).to_string(),
            "Persistence failed: disk full"
        );
    }
}

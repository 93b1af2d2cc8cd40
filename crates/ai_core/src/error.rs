//! Inference errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// No connection could be made
    #[error("Inference server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-success status
    #[error("Inference server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model '{0}' is not installed on the inference server")]
    UnknownModel(String),

    /// The server is overloaded or throttling
    #[error("Inference server busy")]
    Busy,

    /// The body could not be decoded
    #[error("Malformed inference response: {0}")]
    Malformed(String),

    #[error("Inference timed out")]
    Timeout,

    #[error("Invalid inference configuration: {0}")]
    InvalidConfig(String),

    /// Any other HTTP client failure
    #[error("Inference transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable(err.to_string())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl InferenceError {
    /// Whether the same request may succeed later
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Busy | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_code_and_body() {
        let err = InferenceError::Status {
            status: 500,
            body: "out of memory".to_string(),
        };
        assert_eq!(err.to_string(), "Inference server returned 500: out of memory");
    }

    #[test]
    fn transient_errors() {
        assert!(InferenceError::Timeout.is_transient());
        assert!(InferenceError::Busy.is_transient());
        assert!(
            InferenceError::Status {
                status: 502,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !InferenceError::Status {
                status: 400,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!InferenceError::UnknownModel("llama3.2".into()).is_transient());
        assert!(!InferenceError::Malformed("eof".into()).is_transient());
    }
}

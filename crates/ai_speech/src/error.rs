//! Speech synthesis errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// Nothing to speak
    #[error("Speech input is empty")]
    EmptyInput,

    /// Input exceeds the per-request ceiling
    #[error("Speech input of {chars} characters exceeds the {max_chars} character limit")]
    InputTooLong { chars: usize, max_chars: usize },

    /// The backend answered 200 with no audio
    #[error("Speech backend returned no audio")]
    EmptyAudio,

    #[error("Speech backend unreachable: {0}")]
    Unreachable(String),

    /// The backend refused the request
    #[error("Speech request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Speech backend unavailable: {0}")]
    Unavailable(String),

    #[error("Speech backend rate limit reached")]
    RateLimited,

    #[error("Unknown voice '{0}'")]
    UnknownVoice(String),

    #[error("Unknown speech model '{0}'")]
    UnknownModel(String),

    #[error("Speech request timed out")]
    Timeout,

    #[error("Invalid speech configuration: {0}")]
    InvalidConfig(String),

    /// Any other HTTP client failure
    #[error("Speech transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

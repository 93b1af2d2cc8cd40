//! Speech synthesizer port - Interface for text-to-speech

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Encoded speech for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Port for text-to-speech operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// Synthesize speech for `text` in `language`
    ///
    /// `text` must not exceed [`max_input_chars`](Self::max_input_chars)
    /// characters; the backend may reject longer input.
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<SynthesizedAudio, ApplicationError>;

    /// Maximum number of characters accepted per request
    fn max_input_chars(&self) -> usize;

    /// Check if the speech backend is reachable
    async fn is_healthy(&self) -> bool;
}

//! Speech provider port

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::SpeechAudio;

/// Text-to-speech backend
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Speak `text` with `voice`
    ///
    /// Input longer than [`max_input_chars`](Self::max_input_chars) is
    /// rejected without contacting the backend.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<SpeechAudio, SpeechError>;

    /// Whether the backend answers and accepts our credentials
    async fn is_available(&self) -> bool;

    /// Synthesis model name
    fn model(&self) -> &str;

    /// Per-request input ceiling in characters
    fn max_input_chars(&self) -> usize;
}

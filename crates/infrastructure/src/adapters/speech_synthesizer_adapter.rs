//! Speech adapter - Implements SpeechSynthesizerPort using ai_speech crate

use std::{fmt, sync::Arc, time::Instant};

use ai_speech::{OpenAISpeechProvider, SpeechConfig, SpeechError, SpeechProvider};
use application::{
    error::ApplicationError,
    ports::{SpeechSynthesizerPort, SynthesizedAudio},
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for speech synthesis using ai_speech providers
pub struct SpeechSynthesizerAdapter {
    provider: Arc<dyn SpeechProvider>,
    config: SpeechConfig,
}

impl fmt::Debug for SpeechSynthesizerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechSynthesizerAdapter")
            .field("model", &self.provider.model())
            .field("max_input_chars", &self.provider.max_input_chars())
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesizerAdapter {
    /// Create an adapter backed by an OpenAI-compatible speech API
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the provider fails to
    /// initialize (e.g., missing API key).
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = OpenAISpeechProvider::new(config.clone())
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Create an adapter on top of any speech provider; `config` supplies
    /// the per-language voices
    #[must_use]
    pub fn with_provider(provider: Arc<dyn SpeechProvider>, config: SpeechConfig) -> Self {
        Self { provider, config }
    }

    /// Every provider failure is a synthesis failure to the pipeline
    fn map_error(err: SpeechError) -> ApplicationError {
        ApplicationError::SynthesisFailed(err.to_string())
    }
}

#[async_trait]
impl SpeechSynthesizerPort for SpeechSynthesizerAdapter {
    #[instrument(skip(self, text), fields(chars = text.chars().count(), language = %language))]
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        let start = Instant::now();
        let voice = self.config.voice_for_language(language);

        let audio = self
            .provider
            .synthesize(text, voice)
            .await
            .map_err(Self::map_error)?;

        if audio.is_empty() {
            return Err(Self::map_error(SpeechError::EmptyAudio));
        }

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            voice = %voice,
            bytes = audio.len(),
            latency_ms,
            "Speech synthesized"
        );

        let format = audio.format;
        Ok(SynthesizedAudio {
            data: audio.into_vec(),
            format,
        })
    }

    fn max_input_chars(&self) -> usize {
        self.provider.max_input_chars()
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_available().await
    }
}

//! Script generator adapter - Implements ScriptGeneratorPort using ai_core
//!
//! Works with any Ollama-compatible backend. The topic and verbosity
//! profile are rendered into a fixed system + user prompt pair; the profile
//! also sets the token budget of the request.

use std::{fmt, sync::Arc, time::Instant};

use ai_core::{
    InferenceConfig, InferenceEngine, InferenceError, InferenceRequest, OllamaInferenceEngine,
};
use application::{
    error::ApplicationError,
    ports::{GeneratedScript, ScriptGeneratorPort},
};
use async_trait::async_trait;
use domain::{TopicKey, VerbosityProfile};
use tracing::{info, instrument, warn};

const SYSTEM_PROMPT: &str = "You write scripts that are read aloud by a \
text-to-speech voice. Write plain prose in complete sentences. Do not use \
markdown, lists, headings, emojis, links or stage directions.";

/// Adapter turning topic keys into scripts through an inference engine
pub struct InferenceScriptGenerator {
    engine: Arc<dyn InferenceEngine>,
}

impl fmt::Debug for InferenceScriptGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceScriptGenerator")
            .field("model", &self.engine.model())
            .finish_non_exhaustive()
    }
}

impl InferenceScriptGenerator {
    /// Create a generator backed by an Ollama-compatible server
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the inference
    /// configuration is invalid.
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = OllamaInferenceEngine::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_engine(Arc::new(engine)))
    }

    /// Create a generator on top of any inference engine
    #[must_use]
    pub fn with_engine(engine: Arc<dyn InferenceEngine>) -> Self {
        Self { engine }
    }

    /// Render the request for a topic
    fn build_request(&self, key: &TopicKey, profile: VerbosityProfile) -> InferenceRequest {
        let (min_words, max_words) = profile.word_range();
        let user = format!(
            "Write an engaging spoken script of {min_words} to {max_words} words about \
             \"{key}\". Start with a one-line title, then explain the topic for a curious \
             listener who knows nothing about it."
        );

        InferenceRequest::new(user)
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(profile.max_tokens())
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        warn!(error = %e, transient = e.is_transient(), "Inference request failed");
        match e {
            InferenceError::Timeout => {
                ApplicationError::GenerationFailed("Inference request timed out".to_string())
            },
            other => ApplicationError::GenerationFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl ScriptGeneratorPort for InferenceScriptGenerator {
    #[instrument(skip(self, key, profile), fields(key = %key, profile = %profile))]
    async fn generate(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
    ) -> Result<GeneratedScript, ApplicationError> {
        let start = Instant::now();
        let request = self.build_request(key, profile);

        let response = self
            .engine
            .generate(request)
            .await
            .map_err(Self::map_error)?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        let text = response.content.trim();
        if text.is_empty() {
            warn!(model = %response.model, "Inference returned an empty script");
            return Err(ApplicationError::GenerationFailed(
                "Inference returned an empty script".to_string(),
            ));
        }

        if response.is_truncated() {
            warn!(
                model = %response.model,
                max_tokens = profile.max_tokens(),
                "Script hit the token budget and may end mid-sentence"
            );
        }

        info!(
            model = %response.model,
            chars = text.chars().count(),
            latency_ms,
            "Script generated"
        );

        let tokens_used = response.total_tokens();
        Ok(GeneratedScript {
            text: text.to_string(),
            model: response.model,
            tokens_used,
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        self.engine.is_reachable().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_core::{ChatRole, InferenceResponse, StopReason};

    use super::*;

    /// Engine stub that records the requests it receives
    struct Recorder {
        reply: Result<String, MakeError>,
        stop: StopReason,
        seen: Mutex<Vec<InferenceRequest>>,
        reachable: bool,
    }

    #[async_trait]
    impl InferenceEngine for Recorder {
        async fn generate(
            &self,
            request: InferenceRequest,
        ) -> Result<InferenceResponse, InferenceError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(content) => Ok(InferenceResponse {
                    content: content.clone(),
                    model: "stub".to_string(),
                    prompt_tokens: Some(20),
                    completion_tokens: Some(80),
                    stop: self.stop,
                }),
                Err(make) => Err(make()),
            }
        }

        async fn is_reachable(&self) -> bool {
            self.reachable
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    type MakeError = fn() -> InferenceError;

    fn timeout() -> InferenceError {
        InferenceError::Timeout
    }

    fn refused() -> InferenceError {
        InferenceError::Unreachable("connection refused".to_string())
    }

    fn recorder(reply: Result<String, MakeError>) -> Arc<Recorder> {
        Arc::new(Recorder {
            reply,
            stop: StopReason::Completed,
            seen: Mutex::new(Vec::new()),
            reachable: true,
        })
    }

    fn key(raw: &str) -> TopicKey {
        TopicKey::new(raw).unwrap()
    }

    #[tokio::test]
    async fn prompt_names_topic_and_word_band() {
        let engine = recorder(Ok("Knife skills.".to_string()));
        let generator = InferenceScriptGenerator::with_engine(engine.clone());

        generator
            .generate(&key("cooking-tips"), VerbosityProfile::Long)
            .await
            .unwrap();

        let seen = engine.seen.lock().unwrap();
        let request = &seen[0];
        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(request.prompt.contains("\"cooking tips\""));
        assert!(request.prompt.contains("1500 to 2000 words"));
        assert_eq!(request.max_tokens, Some(VerbosityProfile::Long.max_tokens()));
    }

    #[tokio::test]
    async fn speech_oriented_system_prompt_is_sent() {
        let engine = recorder(Ok("ok".to_string()));
        let generator = InferenceScriptGenerator::with_engine(engine.clone());

        generator
            .generate(&key("tea"), VerbosityProfile::Short)
            .await
            .unwrap();

        assert_eq!(
            engine.seen.lock().unwrap()[0].system.as_deref(),
            Some(SYSTEM_PROMPT)
        );
    }

    #[tokio::test]
    async fn script_is_trimmed_and_usage_kept() {
        let generator = InferenceScriptGenerator::with_engine(recorder(Ok(
            "\n  Tea began in China.  \n".to_string(),
        )));

        let script = generator
            .generate(&key("tea"), VerbosityProfile::Short)
            .await
            .unwrap();

        assert_eq!(script.text, "Tea began in China.");
        assert_eq!(script.model, "stub");
        assert_eq!(script.tokens_used, Some(100));
    }

    #[tokio::test]
    async fn whitespace_script_is_generation_failure() {
        let generator = InferenceScriptGenerator::with_engine(recorder(Ok(" \n\t ".to_string())));

        let result = generator.generate(&key("tea"), VerbosityProfile::Short).await;
        assert!(matches!(result, Err(ApplicationError::GenerationFailed(_))));
    }

    #[tokio::test]
    async fn upstream_errors_are_generation_failures() {
        let generator =
            InferenceScriptGenerator::with_engine(recorder(Err(timeout as MakeError)));

        let err = generator
            .generate(&key("tea"), VerbosityProfile::Short)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::GenerationFailed(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn unreachable_server_is_reported() {
        let generator =
            InferenceScriptGenerator::with_engine(recorder(Err(refused as MakeError)));

        let err = generator
            .generate(&key("tea"), VerbosityProfile::Short)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::GenerationFailed(ref m) if m.contains("unreachable")));
    }

    #[tokio::test]
    async fn truncated_script_is_still_returned() {
        let engine = Arc::new(Recorder {
            reply: Ok("Tea began in China and".to_string()),
            stop: StopReason::TokenLimit,
            seen: Mutex::new(Vec::new()),
            reachable: false,
        });
        let generator = InferenceScriptGenerator::with_engine(engine);

        let script = generator
            .generate(&key("tea"), VerbosityProfile::Short)
            .await
            .unwrap();
        assert_eq!(script.text, "Tea began in China and");
        assert!(!generator.is_healthy().await);
    }

    #[test]
    fn invalid_config_is_configuration_error() {
        let config = InferenceConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            InferenceScriptGenerator::new(config),
            Err(ApplicationError::Configuration(_))
        ));
    }
}

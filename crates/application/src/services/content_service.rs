//! Content service - Generate-or-retrieve pipeline for topic content
//!
//! This service orchestrates the complete flow for one topic key:
//! 1. Look up a stored record and serve it if it holds a script
//! 2. Generate a script at the configured verbosity
//! 3. Synthesize audio for the best-fitting chunk of the script
//! 4. Persist script and audio for later lookups
//!
//! Only a failed generation is a hard failure. Missing audio and a failed
//! write still return the generated script to the caller.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use domain::{ContentUpdate, GenerationOutcome, TopicKey, VerbosityProfile};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ContentStorePort, ScriptGeneratorPort, SpeechSynthesizerPort},
    services::{
        audio_chunk_selector::{AudioChunkSelector, ChunkSelectorConfig},
        single_flight::SingleFlight,
    },
};

/// Configuration for the content pipeline
#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    /// Verbosity used when the caller does not override it
    pub profile: VerbosityProfile,
    /// Language passed to speech synthesis (e.g., "en", "de")
    pub language: String,
    /// Upper bound for one generation call
    pub generation_timeout: Duration,
    /// Coalesce concurrent requests for the same key
    pub single_flight: bool,
    /// Audio chunk selection settings
    pub chunk_selector: ChunkSelectorConfig,
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self {
            profile: VerbosityProfile::Short,
            language: "en".to_string(),
            generation_timeout: Duration::from_secs(120),
            single_flight: true,
            chunk_selector: ChunkSelectorConfig::default(),
        }
    }
}

/// Whether a request may be answered from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    CacheFirst,
    Bypass,
}

impl Lookup {
    const fn as_str(self) -> &'static str {
        match self {
            Self::CacheFirst => "cache",
            Self::Bypass => "force",
        }
    }
}

/// The pipeline itself, shared with spawned single-flight tasks
struct Pipeline {
    store: Arc<dyn ContentStorePort>,
    generator: Arc<dyn ScriptGeneratorPort>,
    selector: AudioChunkSelector,
    language: String,
    generation_timeout: Duration,
}

/// Service that returns stored content or produces and stores new content
pub struct ContentService {
    pipeline: Arc<Pipeline>,
    flights: SingleFlight<GenerationOutcome>,
    config: ContentServiceConfig,
}

impl fmt::Debug for ContentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentService")
            .field("config", &self.config)
            .field("flights", &self.flights)
            .finish_non_exhaustive()
    }
}

impl ContentService {
    /// Create a content service with default configuration
    pub fn new(
        store: Arc<dyn ContentStorePort>,
        generator: Arc<dyn ScriptGeneratorPort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
    ) -> Self {
        Self::with_config(store, generator, synthesizer, ContentServiceConfig::default())
    }

    /// Create a content service with custom configuration
    pub fn with_config(
        store: Arc<dyn ContentStorePort>,
        generator: Arc<dyn ScriptGeneratorPort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        config: ContentServiceConfig,
    ) -> Self {
        let selector = AudioChunkSelector::with_config(synthesizer, config.chunk_selector.clone());
        let pipeline = Pipeline {
            store,
            generator,
            selector,
            language: config.language.clone(),
            generation_timeout: config.generation_timeout,
        };

        Self {
            pipeline: Arc::new(pipeline),
            flights: SingleFlight::new(),
            config,
        }
    }

    /// Serve stored content for `key`, or generate it at the configured profile
    pub async fn generate_or_retrieve(&self, key: &TopicKey) -> GenerationOutcome {
        self.generate_or_retrieve_with_profile(key, self.config.profile)
            .await
    }

    /// Serve stored content for `key`, or generate it at `profile`
    ///
    /// A stored record is served regardless of the profile it was generated with.
    pub async fn generate_or_retrieve_with_profile(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
    ) -> GenerationOutcome {
        self.execute(key, profile, Lookup::CacheFirst).await
    }

    /// Generate fresh content for `key`, replacing the stored script
    pub async fn force_regenerate(&self, key: &TopicKey) -> GenerationOutcome {
        self.execute(key, self.config.profile, Lookup::Bypass).await
    }

    /// Generate fresh content for `key` at `profile`, replacing the stored script
    pub async fn force_regenerate_with_profile(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
    ) -> GenerationOutcome {
        self.execute(key, profile, Lookup::Bypass).await
    }

    async fn execute(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
        lookup: Lookup,
    ) -> GenerationOutcome {
        if !self.config.single_flight {
            return self.pipeline.run(key.clone(), profile, lookup).await;
        }

        let flight_key = format!("{}|{}|{}", key, profile, lookup.as_str());
        let pipeline = Arc::clone(&self.pipeline);
        let owned_key = key.clone();

        match self
            .flights
            .run(flight_key, move || async move {
                pipeline.run(owned_key, profile, lookup).await
            })
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(key = %key, error = %e, "Pipeline execution aborted");
                GenerationOutcome::failed(key.clone(), e.to_string())
            },
        }
    }
}

impl Pipeline {
    #[instrument(skip(self, key, profile), fields(key = %key, profile = %profile))]
    async fn run(&self, key: TopicKey, profile: VerbosityProfile, lookup: Lookup) -> GenerationOutcome {
        let start = Instant::now();

        // Step 1: Cache check
        if lookup == Lookup::CacheFirst {
            match self.store.get(&key).await {
                Ok(Some(record)) if record.is_servable() => {
                    info!(has_audio = record.has_audio(), "Serving stored content");
                    return GenerationOutcome::cache_hit(record);
                },
                Ok(_) => debug!("No servable record, generating"),
                Err(e) => warn!(error = %e, "Content lookup failed, treating as miss"),
            }
        }

        // Step 2: Generate script
        info!("Generating script");
        let script = match self.generate(&key, profile).await {
            Ok(script) => script,
            Err(e) => {
                warn!(error = %e, "Script generation failed");
                return GenerationOutcome::failed(key, e.to_string());
            },
        };
        debug!(script_chars = script.chars().count(), "Script generated");

        // Step 3: Synthesize audio
        let audio = self.selector.select(&script, &self.language).await;

        // Step 4: Persist; audio of an earlier script never survives a new script
        let mut update = ContentUpdate::script(script.clone()).replacing_audio();
        if let Some((payload, _)) = &audio {
            update = update.with_audio(payload.data.clone(), payload.format);
        }
        if let Err(e) = self.store.upsert(&key, update).await {
            warn!(error = %e, "Failed to persist generated content");
        }

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;
        info!(
            latency_ms,
            audio_tier = audio.as_ref().map(|(_, tier)| tier.as_str()),
            "Content generated"
        );

        GenerationOutcome::generated(key, script, audio)
    }

    async fn generate(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
    ) -> Result<String, ApplicationError> {
        let generated = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(key, profile),
        )
        .await
        .map_err(|_| {
            ApplicationError::GenerationFailed(format!(
                "timed out after {}ms",
                self.generation_timeout.as_millis()
            ))
        })??;

        let text = generated.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::GenerationFailed(
                "generator returned an empty script".to_string(),
            ));
        }

        Ok(text.to_string())
    }
}

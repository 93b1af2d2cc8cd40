//! Application configuration
//!
//! Split into focused sub-modules:
//! - `generation`: pipeline profile, language, timeouts, chunking
//! - `database`: SQLite database settings
//! - `logging`: log filter and output format
//!
//! Upstream settings reuse the `ai_core` and `ai_speech` config types.

mod database;
mod generation;
mod logging;

use std::path::Path;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use generation::GenerationAppConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Prefix of environment variables that override configuration values
///
/// Nested keys are separated by a double underscore, e.g.
/// `SCRIPTCAST_DATABASE__PATH` or `SCRIPTCAST_SPEECH__OPENAI_API_KEY`.
pub const ENV_PREFIX: &str = "SCRIPTCAST";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Script generation upstream (Ollama-compatible)
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Speech synthesis upstream (OpenAI-compatible)
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Pipeline behavior
    #[serde(default)]
    pub generation: GenerationAppConfig,

    /// Content store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result is
    /// invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required to exist) or the
    /// default `config.toml` (optional), then the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result is
    /// invalid.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(path, None)
    }

    /// Layer defaults, file and environment; `env` replaces the process
    /// environment when given
    fn build(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(
            profile = %config.generation.profile,
            database = %config.database.path,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    ///
    /// The speech API key is not required here; it is checked when the
    /// speech provider is built, so store-only commands work without it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inference
            .validate()
            .map_err(|e| ConfigError::Message(format!("inference: {e}")))?;

        if self.speech.max_input_chars == 0 {
            return Err(ConfigError::Message(
                "speech.max_input_chars must be greater than 0".to_string(),
            ));
        }
        if self.speech.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "speech.timeout_ms must be greater than 0".to_string(),
            ));
        }

        self.generation.validate().map_err(ConfigError::Message)?;

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Message("database.path must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

//! Inference engine settings

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Settings for an Ollama-compatible server
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Server root, e.g. `http://localhost:11434`
    pub base_url: String,
    /// Model used when a request names none
    pub default_model: String,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Token budget when a request sets none
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Nucleus sampling cutoff (0.0 - 1.0)
    pub top_p: f32,
    /// How long the server keeps the model loaded after a request
    /// (Ollama duration string such as `"10m"`); server default when unset
    pub keep_alive: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: "llama3.2".to_string(),
            // long-form scripts are slow on small hardware
            timeout_ms: 120_000,
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
            keep_alive: None,
        }
    }
}

impl InferenceConfig {
    /// Reject values the server cannot work with
    pub fn validate(&self) -> Result<(), InferenceError> {
        let invalid = |msg: String| Err(InferenceError::InvalidConfig(msg));

        if self.base_url.trim().is_empty() {
            return invalid("base_url must not be empty".to_string());
        }
        if self.default_model.trim().is_empty() {
            return invalid("default_model must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return invalid("timeout_ms must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return invalid("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return invalid(format!("temperature {} is outside 0.0 - 2.0", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return invalid(format!("top_p {} is outside 0.0 - 1.0", self.top_p));
        }
        Ok(())
    }
}

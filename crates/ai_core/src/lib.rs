//! Text generation against Ollama-compatible servers
//!
//! [`InferenceEngine`] is the seam; [`OllamaInferenceEngine`] is the only
//! implementation.

pub mod config;
pub mod error;
pub mod ollama;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use ollama::OllamaInferenceEngine;
pub use ports::{
    ChatMessage, ChatRole, InferenceEngine, InferenceRequest, InferenceResponse, StopReason,
};

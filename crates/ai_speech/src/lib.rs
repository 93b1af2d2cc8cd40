//! Text-to-speech for Scriptcast
//!
//! [`SpeechProvider`] is the seam the infrastructure adapter depends on;
//! [`OpenAISpeechProvider`] implements it for OpenAI-compatible
//! `/audio/speech` endpoints.

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::SpeechProvider;
pub use providers::OpenAISpeechProvider;
pub use types::SpeechAudio;

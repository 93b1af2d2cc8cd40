//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod content_store;
mod script_generator;
mod speech_synthesizer;

pub use content_store::ContentStorePort;
#[cfg(test)]
pub use content_store::MockContentStorePort;
pub use script_generator::{GeneratedScript, ScriptGeneratorPort};
#[cfg(test)]
pub use script_generator::MockScriptGeneratorPort;
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesizedAudio};
#[cfg(test)]
pub use speech_synthesizer::MockSpeechSynthesizerPort;

//! Adapters implementing application ports
//!
//! - `InferenceScriptGenerator`: script generation over `ai_core`
//! - `SpeechSynthesizerAdapter`: speech synthesis over `ai_speech`

mod inference_script_generator;
mod speech_synthesizer_adapter;

pub use inference_script_generator::InferenceScriptGenerator;
pub use speech_synthesizer_adapter::SpeechSynthesizerAdapter;

//! Speech provider implementations

pub mod openai;

pub use openai::OpenAISpeechProvider;

//! Ollama backend
//!
//! Uses `POST /api/chat` for generation and `GET /api/version` as a
//! reachability check.

mod client;

pub use client::OllamaInferenceEngine;

//! Application services - Use case implementations

pub mod audio_chunk_selector;
mod content_service;
mod single_flight;

pub use audio_chunk_selector::{AudioChunkSelector, ChunkSelectorConfig};
pub use content_service::{ContentService, ContentServiceConfig};
pub use single_flight::SingleFlight;

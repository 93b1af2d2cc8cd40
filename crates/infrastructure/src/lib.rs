//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the SQLite content
//! store, the Ollama-backed script generator and the OpenAI-compatible
//! speech synthesizer. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, DatabaseConfig, GenerationAppConfig, LogFormat, LoggingConfig};
pub use persistence::{Database, DatabaseError, SqliteContentStore};
pub use telemetry::{TelemetryError, init_logging};

//! Persistence module
//!
//! SQLite-based storage for generated content, built on a shared sqlx pool.

pub mod connection;
pub mod content_store;
pub mod error;

pub use connection::{Database, DatabaseError};
pub use content_store::SqliteContentStore;
pub use error::map_sqlx_error;

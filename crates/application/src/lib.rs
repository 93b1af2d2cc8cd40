//! Application layer - Use cases and orchestration
//!
//! Contains the generate-or-retrieve pipeline and the port definitions it
//! drives. Infrastructure adapters implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

//! Domain layer for Scriptcast
//!
//! Contains the content records, topic keys and generation outcomes that the
//! generate-or-retrieve pipeline works with. This layer has no I/O and
//! defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

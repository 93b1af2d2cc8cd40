//! Domain entities - Objects with identity and lifecycle

mod content_record;
mod generation_outcome;

pub use content_record::{ContentRecord, ContentUpdate};
pub use generation_outcome::{AudioPayload, AudioTier, GenerationOutcome, OutcomeStatus};

//! Value Objects - Immutable, identity-less domain primitives

mod audio_format;
mod topic_key;
mod verbosity_profile;

pub use audio_format::AudioFormat;
pub use topic_key::TopicKey;
pub use verbosity_profile::VerbosityProfile;

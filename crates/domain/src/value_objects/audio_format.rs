//! Audio format value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Encoding of a synthesized audio payload
///
/// The lowercase name doubles as the speech API `response_format` value and
/// as the stored column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    /// Opus in an Ogg container
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    /// Content type to serve the payload with
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/ogg",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "mp3" | "mpeg" => Ok(Self::Mp3),
            "opus" | "ogg" => Ok(Self::Opus),
            "aac" => Ok(Self::Aac),
            "flac" => Ok(Self::Flac),
            "wav" => Ok(Self::Wav),
            _ => Err(DomainError::InvalidAudioFormat(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let all = [
            AudioFormat::Mp3,
            AudioFormat::Opus,
            AudioFormat::Aac,
            AudioFormat::Flac,
            AudioFormat::Wav,
        ];
        for format in all {
            assert_eq!(format.as_str().parse::<AudioFormat>().unwrap(), format);
        }
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!(" MPEG ".parse::<AudioFormat>().unwrap(), AudioFormat::Mp3);
        assert_eq!("ogg".parse::<AudioFormat>().unwrap(), AudioFormat::Opus);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "aiff".parse::<AudioFormat>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidAudioFormat(ref n) if n == "aiff"));
    }

    #[test]
    fn opus_is_served_as_ogg() {
        assert_eq!(AudioFormat::Opus.mime_type(), "audio/ogg");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&AudioFormat::Flac).unwrap(), "\"flac\"");
        let parsed: AudioFormat = serde_json::from_str("\"aac\"").unwrap();
        assert_eq!(parsed, AudioFormat::Aac);
    }
}

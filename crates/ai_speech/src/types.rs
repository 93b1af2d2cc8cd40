//! Audio returned by a speech provider

use bytes::Bytes;
use domain::AudioFormat;

/// Encoded audio for one synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub data: Bytes,
    pub format: AudioFormat,
}

impl SpeechAudio {
    pub fn new(data: impl Into<Bytes>, format: AudioFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Owned copy of the bytes for storage
    pub fn into_vec(self) -> Vec<u8> {
        Vec::from(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_static_and_owned_bytes() {
        let from_vec = SpeechAudio::new(vec![0x4F, 0x67], AudioFormat::Opus);
        let from_static = SpeechAudio::new(Bytes::from_static(&[0x4F, 0x67]), AudioFormat::Opus);

        assert_eq!(from_vec, from_static);
        assert_eq!(from_vec.len(), 2);
        assert_eq!(from_vec.into_vec(), vec![0x4F, 0x67]);
    }

    #[test]
    fn empty_payload() {
        assert!(SpeechAudio::new(Vec::new(), AudioFormat::Mp3).is_empty());
    }
}

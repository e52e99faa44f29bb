//! Core text-to-speech trait, errors, and test doubles.
//!
//! [`TextToSpeech`] is the narrow contract against the synthesis
//! collaborator: text in, PCM audio out at whatever rate the service
//! declares. Fitting that audio to a window (silence, padding, truncation)
//! is the [`SegmentSynthesizer`](crate::tts::SegmentSynthesizer)'s job, not
//! the collaborator's.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::PcmBuffer;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors raised by the text-to-speech boundary.
#[derive(Debug, Error)]
pub enum TtsError {
    /// HTTP transport or connection error.
    #[error("text-to-speech request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("text-to-speech request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("text-to-speech service returned {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse text-to-speech response: {0}")]
    Parse(String),

    /// The returned audio payload could not be decoded.
    #[error("failed to decode synthesized audio: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextToSpeech trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the synthesis collaborator.
///
/// Returns mono PCM at the rate the service chose; the caller normalises to
/// the track format. `text` is never empty — empty windows are synthesized
/// as silence without a collaborator call.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text` as speech.
    async fn synthesize(&self, text: &str) -> Result<PcmBuffer, TtsError>;
}

// Compile-time assertion: the trait must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TextToSpeech>) {}
};

// ---------------------------------------------------------------------------
// MockSynthesizer (test-only)
// ---------------------------------------------------------------------------

/// Test double returning a fixed buffer for every call, or always failing.
#[cfg(test)]
pub struct MockSynthesizer {
    output: Option<PcmBuffer>,
}

#[cfg(test)]
impl MockSynthesizer {
    /// Always answer with a clone of `buffer`.
    pub fn fixed(buffer: PcmBuffer) -> Self {
        Self {
            output: Some(buffer),
        }
    }

    /// A constant-amplitude "speech" buffer, handy for byte-level checks.
    pub fn tone(duration_ms: u64, sample_rate: u32, amplitude: i16) -> Self {
        let samples = vec![amplitude; crate::audio::samples_for_ms(duration_ms, sample_rate)];
        Self::fixed(PcmBuffer::new(sample_rate, samples))
    }

    /// Always fail with a transport error.
    pub fn failing() -> Self {
        Self { output: None }
    }
}

#[cfg(test)]
#[async_trait]
impl TextToSpeech for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<PcmBuffer, TtsError> {
        match &self.output {
            Some(buffer) => Ok(buffer.clone()),
            None => Err(TtsError::Request("mock synthesizer failure".into())),
        }
    }
}

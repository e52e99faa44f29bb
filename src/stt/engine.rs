//! Core speech-to-text trait, errors, and test doubles.
//!
//! [`SpeechToText`] is the narrow contract the pipeline holds against the
//! transcription collaborator: mono 16 kHz PCM in, plain text out. A window
//! of silence or noise legitimately transcribes to an empty string — that is
//! a result, not an error.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::{PcmBuffer, TRACK_RATE};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Errors raised by the speech-to-text boundary.
#[derive(Debug, Error)]
pub enum SttError {
    /// The caller handed over audio that is not mono 16 kHz.
    #[error("transcription input must be {TRACK_RATE} Hz mono, got {0} Hz")]
    InvalidFormat(u32),

    /// HTTP transport or connection error.
    #[error("speech-to-text request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech-to-text request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("speech-to-text service returned {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse speech-to-text response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SttError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SttError::Timeout
        } else {
            SttError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechToText trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the transcription collaborator.
///
/// # Contract
///
/// - `audio` must be mono 16 kHz 16-bit PCM ([`TRACK_RATE`]).
/// - Silence/noise windows return `Ok(String::new())`, never an error.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe one window's audio to plain text.
    async fn transcribe(&self, audio: &PcmBuffer) -> Result<String, SttError>;
}

// Compile-time assertion: the trait must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechToText>) {}
};

// ---------------------------------------------------------------------------
// MockTranscriber (test-only)
// ---------------------------------------------------------------------------

/// Test double returning scripted transcripts, or a fixed error.
#[cfg(test)]
pub struct MockTranscriber {
    script: std::sync::Mutex<std::collections::VecDeque<String>>,
    fallback: Option<String>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Always answer with `text`.
    pub fn ok(text: &str) -> Self {
        Self {
            script: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: Some(text.to_string()),
        }
    }

    /// Answer each call with the next scripted entry, then fail.
    pub fn sequence(texts: &[&str]) -> Self {
        Self {
            script: std::sync::Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
            fallback: None,
        }
    }

    /// Always fail with a transport error.
    pub fn failing() -> Self {
        Self {
            script: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: None,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechToText for MockTranscriber {
    async fn transcribe(&self, audio: &PcmBuffer) -> Result<String, SttError> {
        if audio.sample_rate != TRACK_RATE {
            return Err(SttError::InvalidFormat(audio.sample_rate));
        }
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return Ok(next);
        }
        match &self.fallback {
            Some(text) => Ok(text.clone()),
            None => Err(SttError::Request("mock transcriber exhausted".into())),
        }
    }
}

//! Per-window synthesis with duration matching.
//!
//! [`SegmentSynthesizer`] wraps a [`TextToSpeech`] collaborator and
//! guarantees the one invariant the assembler depends on: every
//! [`SynthesizedSegment`]'s audio is **exactly** as long as its window.
//!
//! * No text (window dropped by the rewrite stage) or blank text → pure
//!   silence of the nominal duration, no collaborator call.
//! * Speech shorter than the window → trailing silence is appended; speech
//!   content is never cut.
//! * Speech longer than the window → truncated to the nominal duration with
//!   a short fade-out, so one verbose window cannot desynchronise every
//!   window after it.

use std::sync::Arc;

use crate::audio::{resample, PcmBuffer, TRACK_RATE};
use crate::timeline::TimeWindow;
use crate::tts::engine::{TextToSpeech, TtsError};

/// Fade length applied when truncating overrunning speech.
const TRUNCATE_FADE_MS: u64 = 10;

// ---------------------------------------------------------------------------
// SynthesizedSegment
// ---------------------------------------------------------------------------

/// One window's replacement audio, duration-matched to the window.
///
/// Invariant: `audio.duration_ms() == window.duration_ms()` and
/// `audio.sample_rate == TRACK_RATE`.
#[derive(Debug, Clone)]
pub struct SynthesizedSegment {
    pub window: TimeWindow,
    pub audio: PcmBuffer,
}

impl SynthesizedSegment {
    /// Pure silence spanning `window` — used for dropped windows and as the
    /// gap filler when synthesis of a window fails.
    pub fn silence(window: TimeWindow) -> Self {
        Self {
            audio: PcmBuffer::silence(window.duration_ms(), TRACK_RATE),
            window,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.audio.duration_ms()
    }
}

// ---------------------------------------------------------------------------
// SegmentSynthesizer
// ---------------------------------------------------------------------------

/// Wraps the synthesis collaborator with window fitting.
pub struct SegmentSynthesizer {
    engine: Arc<dyn TextToSpeech>,
}

impl SegmentSynthesizer {
    pub fn new(engine: Arc<dyn TextToSpeech>) -> Self {
        Self { engine }
    }

    /// Produce the replacement audio for `window`.
    ///
    /// `text` is the rewritten transcript entry: `None` when the rewrite
    /// stage dropped the window, `Some` otherwise.
    pub async fn synthesize_window(
        &self,
        window: &TimeWindow,
        text: Option<&str>,
    ) -> Result<SynthesizedSegment, TtsError> {
        let nominal_ms = window.duration_ms();

        let text = text.map(str::trim).unwrap_or("");
        if text.is_empty() {
            log::debug!("tts: window {window} is silent");
            return Ok(SynthesizedSegment::silence(*window));
        }

        let speech = self.engine.synthesize(text).await?;
        let mut audio = resample(&speech, TRACK_RATE);

        let speech_ms = audio.duration_ms();
        if speech_ms > nominal_ms {
            log::warn!(
                "tts: window {window} synthesized {speech_ms} ms of speech, \
                 truncating to {nominal_ms} ms"
            );
            audio.truncate_with_fade(nominal_ms, TRUNCATE_FADE_MS);
        }
        audio.pad_to(nominal_ms);

        debug_assert_eq!(audio.duration_ms(), nominal_ms);
        Ok(SynthesizedSegment {
            window: *window,
            audio,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

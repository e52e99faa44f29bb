//! Replacement-track assembly.
//!
//! [`assemble`] concatenates per-window synthesized audio into one
//! continuous buffer. Ordering is a caller precondition: segments must
//! arrive sorted by window start time. The assembler does not re-sort —
//! handing it unordered segments is a defect, caught by `debug_assert!`,
//! not a runtime condition it silently fixes.

use crate::audio::{PcmBuffer, TRACK_RATE};
use crate::tts::SynthesizedSegment;

// ---------------------------------------------------------------------------
// GapPolicy
// ---------------------------------------------------------------------------

/// What to do with a window whose synthesis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GapPolicy {
    /// Substitute exact-duration silence. The assembled track always equals
    /// the source duration.
    #[default]
    FillSilence,
    /// Omit the window entirely. The track comes out shorter than the
    /// source — audio after the gap plays early.
    Skip,
}

// ---------------------------------------------------------------------------
// assemble
// ---------------------------------------------------------------------------

/// Concatenate `segments` in the given order into one track buffer.
///
/// Duration law: the output's duration equals the sum of the segment
/// durations (exact — all segments share [`TRACK_RATE`], where windows are
/// sample-exact).
///
/// # Preconditions (debug-asserted)
/// Segments are sorted by ascending window start with no overlap. Gaps are
/// permitted — [`GapPolicy::Skip`] legitimately produces them.
pub fn assemble(segments: &[SynthesizedSegment]) -> PcmBuffer {
    debug_assert!(
        segments
            .windows(2)
            .all(|pair| pair[0].window.end_ms <= pair[1].window.start_ms),
        "assemble() called with segments out of window order"
    );

    let total_samples: usize = segments.iter().map(|s| s.audio.samples.len()).sum();
    let mut track = PcmBuffer::new(TRACK_RATE, Vec::with_capacity(total_samples));

    for segment in segments {
        track.append(&segment.audio);
    }

    track
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Text-to-speech boundary and window-exact synthesis.
//!
//! * [`TextToSpeech`] — async trait over the synthesis collaborator.
//! * [`GoogleSynthesizer`] — Cloud TTS REST implementation.
//! * [`SegmentSynthesizer`] — fits collaborator output to a window
//!   (silence, padding, overrun truncation).

pub mod engine;
pub mod google;
pub mod segment;

pub use engine::{TextToSpeech, TtsError};
pub use google::GoogleSynthesizer;
pub use segment::{SegmentSynthesizer, SynthesizedSegment};

// test-only re-export so sibling test modules can import the mock directly.
#[cfg(test)]
pub use engine::MockSynthesizer;

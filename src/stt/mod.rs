//! Speech-to-text boundary.
//!
//! * [`SpeechToText`] — async trait the pipeline programs against.
//! * [`GoogleTranscriber`] — Cloud Speech REST implementation.
//! * [`SttError`] — boundary error variants.

pub mod engine;
pub mod google;

pub use engine::{SpeechToText, SttError};
pub use google::GoogleTranscriber;

// test-only re-export so sibling test modules can import the mock directly.
#[cfg(test)]
pub use engine::MockTranscriber;

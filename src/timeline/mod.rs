//! Timeline partitioning and the ordered transcript collection.
//!
//! The pipeline's unit of work is the [`TimeWindow`]: [`partition`] splits
//! the media timeline into a strictly ordered, gapless window sequence, and
//! [`Transcript`] carries per-window text through the transcribe → rewrite
//! round trip while preserving that order explicitly.

pub mod transcript;
pub mod window;

pub use transcript::Transcript;
pub use window::{partition, TimeWindow, WindowError};

//! Pipeline orchestration.
//!
//! [`Redubber`] wires the media backend and the three collaborator
//! boundaries into the full run:
//!
//! ```text
//! partition ─▶ {extract ─▶ transcribe} per window ─▶ rewrite (batch)
//!           ─▶ {synthesize} per window ─▶ assemble ─▶ remux
//! ```

pub mod runner;

pub use runner::{PipelineConfig, PipelineError, Redubber, RunReport};

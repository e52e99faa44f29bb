//! Media container layer — duration probing, window extraction, remuxing.

pub mod backend;
pub mod ffmpeg;

pub use backend::{MediaBackend, MediaError};
pub use ffmpeg::FfmpegBackend;

// test-only re-export so pipeline tests can import MockMedia directly.
#[cfg(test)]
pub use backend::MockMedia;

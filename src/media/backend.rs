//! Media backend seam — probing, per-window extraction, remuxing.
//!
//! [`MediaBackend`] is the object-safe interface the pipeline holds behind an
//! `Arc<dyn MediaBackend>`. The production implementation is
//! [`FfmpegBackend`](crate::media::FfmpegBackend); tests swap in
//! [`MockMedia`] so the pipeline can run without a container file or ffmpeg
//! on the machine.

use std::path::Path;

use thiserror::Error;

use crate::audio::{PcmBuffer, WavError};
use crate::timeline::TimeWindow;

// ---------------------------------------------------------------------------
// MediaError
// ---------------------------------------------------------------------------

/// Errors raised by media probing, extraction and remuxing.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The container's duration could not be determined.
    #[error("failed to probe media duration of '{path}': {message}")]
    Probe { path: String, message: String },

    /// Audio for a window could not be decoded — the window lies outside the
    /// media's real duration, or the decoder failed.
    #[error("audio extraction failed for window {window}: {message}")]
    Extraction { window: TimeWindow, message: String },

    /// The replacement track could not be attached to the video.
    #[error("remux failed: {message}")]
    Remux { message: String },

    /// Scratch WAV produced by the extractor could not be decoded.
    #[error(transparent)]
    Wav(#[from] WavError),

    /// Subprocess or scratch-file I/O failure (ffmpeg/ffprobe not found,
    /// temp dir not writable).
    #[error("media subprocess I/O: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// MediaBackend trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the media container layer.
///
/// All three operations are blocking (subprocess + filesystem work); the
/// pipeline calls them through `tokio::task::spawn_blocking`.
pub trait MediaBackend: Send + Sync {
    /// Total duration of the container's timeline, in seconds.
    fn probe_duration(&self, video: &Path) -> Result<f64, MediaError>;

    /// Decode the audio of `window` as mono 16 kHz 16-bit PCM.
    ///
    /// Returns [`MediaError::Extraction`] when the window yields no audio
    /// (it lies outside the media's actual duration).
    fn extract_window(&self, video: &Path, window: &TimeWindow) -> Result<PcmBuffer, MediaError>;

    /// Write a copy of `video` to `output` with its audio stream replaced by
    /// `track`. The source file is never modified.
    fn remux(&self, video: &Path, track: &PcmBuffer, output: &Path) -> Result<(), MediaError>;
}

// Compile-time assertion: the trait must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn MediaBackend>) {}
};

// ---------------------------------------------------------------------------
// MockMedia (test-only)
// ---------------------------------------------------------------------------

/// Test double: a fixed-duration container of pure silence that records the
/// track handed to `remux`.
#[cfg(test)]
pub struct MockMedia {
    duration_secs: f64,
    /// Duration (ms) of the last remuxed track, for assertions.
    pub remuxed_ms: std::sync::Mutex<Option<u64>>,
}

#[cfg(test)]
impl MockMedia {
    pub fn silent(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            remuxed_ms: std::sync::Mutex::new(None),
        }
    }
}

#[cfg(test)]
impl MediaBackend for MockMedia {
    fn probe_duration(&self, _video: &Path) -> Result<f64, MediaError> {
        Ok(self.duration_secs)
    }

    fn extract_window(
        &self,
        _video: &Path,
        window: &TimeWindow,
    ) -> Result<PcmBuffer, MediaError> {
        let total_ms = (self.duration_secs * 1000.0).round() as u64;
        if window.end_ms > total_ms {
            return Err(MediaError::Extraction {
                window: *window,
                message: "window lies outside media duration".into(),
            });
        }
        Ok(PcmBuffer::silence(
            window.duration_ms(),
            crate::audio::TRACK_RATE,
        ))
    }

    fn remux(&self, _video: &Path, track: &PcmBuffer, _output: &Path) -> Result<(), MediaError> {
        *self.remuxed_ms.lock().unwrap() = Some(track.duration_ms());
        Ok(())
    }
}

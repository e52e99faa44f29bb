//! Audio buffers, WAV I/O and format normalisation.
//!
//! # Pipeline
//!
//! ```text
//! ffmpeg scratch WAV ─┐
//!                     ├─▶ wav::read_* ─▶ downmix_to_mono ─▶ PcmBuffer
//! TTS audioContent  ──┘                      │
//!                                            ▼
//!                              resample(…, TRACK_RATE) ─▶ track-format audio
//! ```

pub mod pcm;
pub mod resample;
pub mod wav;

pub use pcm::{samples_for_ms, PcmBuffer, TRACK_RATE};
pub use resample::{downmix_to_mono, resample};
pub use wav::{read_wav_bytes, read_wav_file, write_wav_file, WavError};

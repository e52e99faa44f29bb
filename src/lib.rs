//! `redub` — re-dub a video through a window-aligned transcribe → rewrite →
//! resynthesize pipeline.
//!
//! The timeline is partitioned into fixed-length [`timeline::TimeWindow`]s;
//! each window's audio is transcribed by a speech-to-text collaborator, the
//! batched transcript is optionally rewritten by an LLM collaborator, each
//! window is resynthesized by a text-to-speech collaborator and fitted to
//! its exact duration, and the concatenated track replaces the source
//! video's audio stream.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use redub::config::AppConfig;
//! use redub::media::FfmpegBackend;
//! use redub::pipeline::{PipelineConfig, Redubber};
//! use redub::rewrite::IdentityRewriter;
//! use redub::stt::GoogleTranscriber;
//! use redub::tts::GoogleSynthesizer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load()?;
//! let redubber = Redubber::new(
//!     Arc::new(FfmpegBackend::with_binaries(
//!         &config.media.ffmpeg,
//!         &config.media.ffprobe,
//!     )),
//!     Arc::new(GoogleTranscriber::from_config(&config.stt)),
//!     Arc::new(IdentityRewriter),
//!     Arc::new(GoogleSynthesizer::from_config(&config.tts)),
//!     PipelineConfig {
//!         window_secs: config.window_secs,
//!         gap_policy: config.gap_policy,
//!     },
//! );
//! let report = redubber.run(Path::new("in.mp4"), Path::new("out.mp4")).await?;
//! println!("re-dubbed {} windows", report.windows);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod media;
pub mod pipeline;
pub mod rewrite;
pub mod stt;
pub mod timeline;
pub mod track;
pub mod tts;

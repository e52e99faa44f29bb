//! Pipeline orchestrator — drives the full re-dub run.
//!
//! [`Redubber`] owns the collaborator seams and processes one video end to
//! end:
//!
//! ```text
//! probe duration ─▶ partition into windows
//!   └─▶ per window: extract (spawn_blocking) ─▶ transcribe     [sequential]
//!         └─▶ rewrite whole batch (single request)
//!               └─▶ per window: synthesize, fit to window      [sequential]
//!                     └─▶ assemble track ─▶ remux (spawn_blocking)
//! ```
//!
//! Each stage completion is logged at `info!` so a multi-minute job is
//! observable. A fatal error halts the run and names the failing stage and
//! window; a per-window synthesis failure is soft and handled by the
//! configured [`GapPolicy`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::PcmBuffer;
use crate::media::{MediaBackend, MediaError};
use crate::rewrite::{RewriteError, TranscriptRewriter};
use crate::stt::{SpeechToText, SttError};
use crate::timeline::{partition, TimeWindow, Transcript, WindowError};
use crate::track::{assemble, GapPolicy};
use crate::tts::{SegmentSynthesizer, SynthesizedSegment, TextToSpeech};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Fatal pipeline errors. Each variant carries enough context to identify
/// the failing stage, and the failing window where one exists.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad parameters, detected before any collaborator call.
    #[error(transparent)]
    InvalidInput(#[from] WindowError),

    /// The input container's duration could not be determined.
    #[error("probing input failed: {source}")]
    Probe {
        #[source]
        source: MediaError,
    },

    /// Audio extraction failed for a window.
    #[error("extraction failed at window {window}: {source}")]
    Extraction {
        window: TimeWindow,
        #[source]
        source: MediaError,
    },

    /// The transcription collaborator failed for a window.
    #[error("transcription failed at window {window}: {source}")]
    Transcription {
        window: TimeWindow,
        #[source]
        source: SttError,
    },

    /// The batch rewrite failed — aborts the whole run, there is no
    /// per-window fallback for a single combined request.
    #[error("transcript rewrite failed: {source}")]
    Rewrite {
        #[from]
        source: RewriteError,
    },

    /// The final remux failed.
    #[error("remux failed: {source}")]
    Remux {
        #[source]
        source: MediaError,
    },

    /// A blocking task panicked or was cancelled.
    #[error("internal task failure: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// Summary of a completed run, for the caller to judge the result.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of windows the timeline was partitioned into.
    pub windows: usize,
    /// Windows whose transcript carried non-blank text after rewriting.
    pub spoken_windows: usize,
    /// Windows whose synthesis failed and were handled by the gap policy.
    pub synthesis_failures: Vec<TimeWindow>,
    /// Duration of the assembled replacement track, in milliseconds.
    pub track_duration_ms: u64,
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// The pipeline-level knobs (collaborator settings live in their clients).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nominal window length in seconds.
    pub window_secs: f64,
    /// Handling of windows whose synthesis failed.
    pub gap_policy: GapPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            gap_policy: GapPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Redubber
// ---------------------------------------------------------------------------

/// Drives the complete re-dub pipeline.
///
/// All collaborators are injected at construction time; the runner holds no
/// ambient state and a single instance can process several videos in turn.
pub struct Redubber {
    media: Arc<dyn MediaBackend>,
    stt: Arc<dyn SpeechToText>,
    rewriter: Arc<dyn TranscriptRewriter>,
    synthesizer: SegmentSynthesizer,
    config: PipelineConfig,
}

impl Redubber {
    /// Create a runner over the given collaborator clients.
    pub fn new(
        media: Arc<dyn MediaBackend>,
        stt: Arc<dyn SpeechToText>,
        rewriter: Arc<dyn TranscriptRewriter>,
        tts: Arc<dyn TextToSpeech>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            media,
            stt,
            rewriter,
            synthesizer: SegmentSynthesizer::new(tts),
            config,
        }
    }

    /// Re-dub `input` and write the result to `output`.
    ///
    /// The source file is never modified. Windows are processed
    /// sequentially: each is extracted and transcribed fully before the
    /// next, the rewrite runs as one batch, then each window is synthesized
    /// in order.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunReport, PipelineError> {
        // ── 1. Probe + partition ─────────────────────────────────────────
        let total_secs = {
            let media = Arc::clone(&self.media);
            let path = input.to_path_buf();
            spawn_blocking(move || media.probe_duration(&path))
                .await?
                .map_err(|source| PipelineError::Probe { source })?
        };

        let windows = partition(total_secs, self.config.window_secs)?;
        log::info!(
            "pipeline: windowing complete — {} windows over {total_secs:.2} s",
            windows.len()
        );

        // ── 2. Extract + transcribe, window by window ────────────────────
        let mut transcript = Transcript::new(windows.clone());
        for window in &windows {
            let audio = {
                let media = Arc::clone(&self.media);
                let path = input.to_path_buf();
                let window = *window;
                spawn_blocking(move || media.extract_window(&path, &window))
                    .await?
                    .map_err(|source| PipelineError::Extraction { window, source })?
            };

            let text = self
                .stt
                .transcribe(&audio)
                .await
                .map_err(|source| PipelineError::Transcription {
                    window: *window,
                    source,
                })?;

            log::debug!("pipeline: window {window} transcribed as {text:?}");
            transcript.insert(*window, text);
        }
        log::info!(
            "pipeline: transcription complete — {}/{} windows carry speech",
            transcript.spoken_windows(),
            windows.len()
        );

        // ── 3. Rewrite the whole batch ───────────────────────────────────
        let rewritten = self.rewriter.rewrite(&transcript).await?;
        log::info!(
            "pipeline: rewrite complete — {}/{} windows kept",
            rewritten.spoken_windows(),
            windows.len()
        );

        // ── 4. Synthesize each window, fitting to its duration ───────────
        let mut segments: Vec<SynthesizedSegment> = Vec::with_capacity(windows.len());
        let mut synthesis_failures = Vec::new();
        for window in &windows {
            match self
                .synthesizer
                .synthesize_window(window, rewritten.get(window))
                .await
            {
                Ok(segment) => segments.push(segment),
                Err(e) => {
                    synthesis_failures.push(*window);
                    match self.config.gap_policy {
                        GapPolicy::FillSilence => {
                            log::warn!(
                                "pipeline: synthesis failed at window {window} ({e}), \
                                 filling with silence"
                            );
                            segments.push(SynthesizedSegment::silence(*window));
                        }
                        GapPolicy::Skip => {
                            log::warn!(
                                "pipeline: synthesis failed at window {window} ({e}), \
                                 skipping — track will be shorter than the source"
                            );
                        }
                    }
                }
            }
        }
        log::info!(
            "pipeline: synthesis complete — {} segments, {} failures",
            segments.len(),
            synthesis_failures.len()
        );

        // ── 5. Assemble + remux ──────────────────────────────────────────
        let track = assemble(&segments);
        let track_duration_ms = track.duration_ms();
        log::info!("pipeline: assembly complete — track is {track_duration_ms} ms");

        {
            let media = Arc::clone(&self.media);
            let input = input.to_path_buf();
            let output = output.to_path_buf();
            spawn_blocking(move || remux_track(&*media, &input, track, &output))
                .await?
                .map_err(|source| PipelineError::Remux { source })?;
        }
        log::info!("pipeline: remux complete — {}", output.display());

        Ok(RunReport {
            windows: windows.len(),
            spoken_windows: rewritten.spoken_windows(),
            synthesis_failures,
            track_duration_ms,
        })
    }
}

fn remux_track(
    media: &dyn MediaBackend,
    input: &PathBuf,
    track: PcmBuffer,
    output: &PathBuf,
) -> Result<(), MediaError> {
    media.remux(input, &track, output)
}

async fn spawn_blocking<T: Send + 'static>(
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<T, PipelineError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PipelineError::Internal(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::audio::TRACK_RATE;
    use crate::media::MockMedia;
    use crate::rewrite::IdentityRewriter;
    use crate::stt::MockTranscriber;
    use crate::tts::MockSynthesizer;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Rewriter that drops every window whose text equals a filler word.
    struct DropFiller;

    #[async_trait]
    impl TranscriptRewriter for DropFiller {
        async fn rewrite(&self, transcript: &Transcript) -> Result<Transcript, RewriteError> {
            let mut out = Transcript::new(transcript.windows().to_vec());
            for (window, text) in transcript.iter() {
                match text {
                    Some(t) if !t.trim().is_empty() && t.trim() != "um" => {
                        out.insert(*window, t.to_string());
                    }
                    _ => {}
                }
            }
            Ok(out)
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_redubber(
        media: Arc<MockMedia>,
        stt: MockTranscriber,
        rewriter: Arc<dyn TranscriptRewriter>,
        tts: MockSynthesizer,
        gap_policy: GapPolicy,
    ) -> Redubber {
        Redubber::new(
            media,
            Arc::new(stt),
            rewriter,
            Arc::new(tts),
            PipelineConfig {
                window_secs: 1.0,
                gap_policy,
            },
        )
    }

    fn paths() -> (PathBuf, PathBuf) {
        (PathBuf::from("in.mp4"), PathBuf::from("out.mp4"))
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// End-to-end: a 3 s silent video becomes 3 windows of silence and a
    /// 3 s replacement track, without a single synthesis collaborator call.
    #[tokio::test]
    async fn silent_video_end_to_end() {
        let media = Arc::new(MockMedia::silent(3.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::ok(""),
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(), // must never be called
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let report = redubber.run(&input, &output).await.unwrap();

        assert_eq!(report.windows, 3);
        assert_eq!(report.spoken_windows, 0);
        assert!(report.synthesis_failures.is_empty());
        assert_eq!(report.track_duration_ms, 3000);
        assert_eq!(*media.remuxed_ms.lock().unwrap(), Some(3000));
    }

    /// Spoken windows flow through rewrite and synthesis; dropped filler
    /// windows come out as silence, and the track still spans the source.
    #[tokio::test]
    async fn speech_and_filler_windows() {
        let media = Arc::new(MockMedia::silent(3.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::sequence(&["hello", "um", "world"]),
            Arc::new(DropFiller),
            MockSynthesizer::tone(400, TRACK_RATE, 6_000),
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let report = redubber.run(&input, &output).await.unwrap();

        assert_eq!(report.windows, 3);
        assert_eq!(report.spoken_windows, 2); // "um" dropped
        assert_eq!(report.track_duration_ms, 3000);
    }

    /// A fractional total duration produces a truncated last window and a
    /// track of exactly the source duration.
    #[tokio::test]
    async fn fractional_duration_track_is_exact() {
        let media = Arc::new(MockMedia::silent(2.5));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::ok(""),
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(),
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let report = redubber.run(&input, &output).await.unwrap();

        assert_eq!(report.windows, 3);
        assert_eq!(report.track_duration_ms, 2500);
    }

    /// Synthesis failure under FillSilence keeps the duration law and
    /// records the failed window.
    #[tokio::test]
    async fn synthesis_failure_fills_silence() {
        let media = Arc::new(MockMedia::silent(2.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::ok("speech"),
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(),
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let report = redubber.run(&input, &output).await.unwrap();

        assert_eq!(report.synthesis_failures.len(), 2);
        assert_eq!(report.track_duration_ms, 2000);
    }

    /// Synthesis failure under Skip shortens the track — the documented
    /// trade-off of that policy.
    #[tokio::test]
    async fn synthesis_failure_skip_shortens_track() {
        let media = Arc::new(MockMedia::silent(2.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::ok("speech"),
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(),
            GapPolicy::Skip,
        );
        let (input, output) = paths();

        let report = redubber.run(&input, &output).await.unwrap();

        assert_eq!(report.synthesis_failures.len(), 2);
        assert_eq!(report.track_duration_ms, 0);
    }

    /// A zero-length container is invalid input, detected before any
    /// collaborator call.
    #[tokio::test]
    async fn zero_duration_is_invalid_input() {
        let media = Arc::new(MockMedia::silent(0.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::ok(""),
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(),
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let err = redubber.run(&input, &output).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    /// A transcription failure is fatal and names the failing window.
    #[tokio::test]
    async fn transcription_failure_names_window() {
        let media = Arc::new(MockMedia::silent(3.0));
        let redubber = make_redubber(
            Arc::clone(&media),
            MockTranscriber::sequence(&["first"]), // second call fails
            Arc::new(IdentityRewriter),
            MockSynthesizer::failing(),
            GapPolicy::FillSilence,
        );
        let (input, output) = paths();

        let err = redubber.run(&input, &output).await.unwrap_err();
        match err {
            PipelineError::Transcription { window, .. } => {
                assert_eq!(window, TimeWindow::new(1000, 2000));
            }
            other => panic!("expected Transcription error, got {other:?}"),
        }
    }
}

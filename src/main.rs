//! Application entry point — `redub` CLI.
//!
//! # Startup sequence
//!
//! 1. Parse CLI arguments.
//! 2. Initialise logging (`-v` raises the filter to debug).
//! 3. Load [`AppConfig`] from disk (defaults on first run), apply CLI
//!    overrides.
//! 4. Build the media backend and the three collaborator clients from
//!    config and inject them into the [`Redubber`].
//! 5. Run the pipeline and print the run report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use redub::config::AppConfig;
use redub::media::FfmpegBackend;
use redub::pipeline::{PipelineConfig, Redubber};
use redub::rewrite::{ApiRewriter, IdentityRewriter, TranscriptRewriter};
use redub::stt::GoogleTranscriber;
use redub::track::GapPolicy;
use redub::tts::GoogleSynthesizer;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Re-dub a video: transcribe, rewrite and resynthesize its audio track.
#[derive(Debug, Parser)]
#[command(name = "redub", version, about)]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Output video file (a new file; the input is never modified).
    output: PathBuf,

    /// Settings file (defaults to the platform config path).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nominal window length in seconds.
    #[arg(long)]
    window_length: Option<f64>,

    /// Speech language tag for transcription (e.g. en-US).
    #[arg(long)]
    language: Option<String>,

    /// Voice name for synthesis.
    #[arg(long)]
    voice: Option<String>,

    /// Disable the transcript rewrite stage.
    #[arg(long)]
    no_rewrite: bool,

    /// Handling of windows whose synthesis failed.
    #[arg(long, value_enum)]
    gap_policy: Option<GapPolicy>,

    /// Verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // ── Config + CLI overrides ───────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    if let Some(window_length) = cli.window_length {
        config.window_secs = window_length;
    }
    if let Some(language) = cli.language {
        config.stt.language = language;
    }
    if let Some(voice) = cli.voice {
        config.tts.voice = voice;
    }
    if let Some(gap_policy) = cli.gap_policy {
        config.gap_policy = gap_policy;
    }
    if cli.no_rewrite {
        config.rewrite.enabled = false;
    }

    // ── Build collaborators from config ──────────────────────────────────
    let media = Arc::new(FfmpegBackend::with_binaries(
        &config.media.ffmpeg,
        &config.media.ffprobe,
    ));
    let stt = Arc::new(GoogleTranscriber::from_config(&config.stt));
    let tts = Arc::new(GoogleSynthesizer::from_config(&config.tts));
    let rewriter: Arc<dyn TranscriptRewriter> = if config.rewrite.enabled {
        Arc::new(ApiRewriter::from_config(&config.rewrite))
    } else {
        log::info!("rewrite stage disabled — passing transcripts through unchanged");
        Arc::new(IdentityRewriter)
    };

    let redubber = Redubber::new(
        media,
        stt,
        rewriter,
        tts,
        PipelineConfig {
            window_secs: config.window_secs,
            gap_policy: config.gap_policy,
        },
    );

    // ── Run ──────────────────────────────────────────────────────────────
    let report = redubber.run(&cli.input, &cli.output).await?;

    println!(
        "re-dubbed {} → {}: {} windows ({} spoken), track {} ms",
        cli.input.display(),
        cli.output.display(),
        report.windows,
        report.spoken_windows,
        report.track_duration_ms,
    );
    if !report.synthesis_failures.is_empty() {
        println!(
            "warning: synthesis failed for {} window(s); see the log",
            report.synthesis_failures.len()
        );
    }

    Ok(())
}

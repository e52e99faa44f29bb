//! ffmpeg/ffprobe implementation of [`MediaBackend`].
//!
//! Extraction decodes one window's audio to a scratch WAV
//! (`tempfile::NamedTempFile`, removed on drop) at mono 16 kHz s16le — the
//! transcription collaborator's required input format. Remuxing maps the
//! source's video stream together with the replacement track and encodes the
//! fixed libx264 / aac output profile to a new path, leaving the source
//! untouched.

use std::path::Path;
use std::process::Command;

use crate::audio::{read_wav_file, write_wav_file, PcmBuffer, TRACK_RATE};
use crate::media::backend::{MediaBackend, MediaError};
use crate::timeline::TimeWindow;

// ---------------------------------------------------------------------------
// FfmpegBackend
// ---------------------------------------------------------------------------

/// Production media backend that shells out to `ffmpeg` and `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegBackend {
    /// Use `ffmpeg`/`ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Use explicit binary paths (from config).
    pub fn with_binaries(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Run a command, mapping a non-zero exit to `Err(stderr)`.
    fn run(cmd: &mut Command) -> Result<String, MediaError> {
        log::debug!("media: running {cmd:?}");
        let output = cmd.output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(MediaError::Remux { message: stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for FfmpegBackend {
    fn probe_duration(&self, video: &Path) -> Result<f64, MediaError> {
        let probe_err = |message: String| MediaError::Probe {
            path: video.display().to_string(),
            message,
        };

        let output = Command::new(&self.ffprobe)
            .args(["-v", "error"])
            .args(["-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(video)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(probe_err(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f64>()
            .map_err(|e| probe_err(format!("unparseable duration {:?}: {e}", stdout.trim())))
    }

    fn extract_window(&self, video: &Path, window: &TimeWindow) -> Result<PcmBuffer, MediaError> {
        let scratch = tempfile::Builder::new()
            .prefix("redub-extract-")
            .suffix(".wav")
            .tempfile()?;

        let result = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-ss", &format!("{:.3}", window.start_secs())])
            .args(["-t", &format!("{:.3}", window.duration_ms() as f64 / 1000.0)])
            .arg("-i")
            .arg(video)
            .args(["-vn", "-ac", "1"])
            .args(["-ar", &TRACK_RATE.to_string()])
            .args(["-c:a", "pcm_s16le"])
            .arg(scratch.path())
            .output()?;

        if !result.status.success() {
            return Err(MediaError::Extraction {
                window: *window,
                message: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let buffer = read_wav_file(scratch.path())?;
        if buffer.samples.is_empty() {
            // ffmpeg exits cleanly when seeking past the end of the file; an
            // empty decode is how an out-of-range window manifests.
            return Err(MediaError::Extraction {
                window: *window,
                message: "window lies outside the media's duration".into(),
            });
        }
        Ok(buffer)
    }

    fn remux(&self, video: &Path, track: &PcmBuffer, output: &Path) -> Result<(), MediaError> {
        let scratch = tempfile::Builder::new()
            .prefix("redub-track-")
            .suffix(".wav")
            .tempfile()?;
        write_wav_file(scratch.path(), track)?;

        Self::run(
            Command::new(&self.ffmpeg)
                .args(["-hide_banner", "-loglevel", "error", "-y"])
                .arg("-i")
                .arg(video)
                .arg("-i")
                .arg(scratch.path())
                .args(["-map", "0:v:0", "-map", "1:a:0"])
                .args(["-c:v", "libx264", "-c:a", "aac"])
                .arg(output),
        )?;

        log::info!("media: wrote remuxed video to {}", output.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A missing binary surfaces as an I/O error, not a panic.
    #[test]
    fn missing_ffprobe_is_io_error() {
        let backend = FfmpegBackend::with_binaries(
            "/nonexistent/ffmpeg-bin",
            "/nonexistent/ffprobe-bin",
        );
        let err = backend.probe_duration(Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }

    #[test]
    fn missing_ffmpeg_is_io_error_on_extract() {
        let backend = FfmpegBackend::with_binaries(
            "/nonexistent/ffmpeg-bin",
            "/nonexistent/ffprobe-bin",
        );
        let window = TimeWindow::new(0, 1000);
        let err = backend
            .extract_window(Path::new("in.mp4"), &window)
            .unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }
}

//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they round-trip through TOML files and can be cloned into the
//! collaborator clients at construction time. Collaborator credentials live
//! here — clients are built from config and injected; nothing reads the
//! environment at call time.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::track::GapPolicy;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-to-text collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Base URL of the Cloud Speech REST endpoint.
    pub endpoint: String,
    /// API key — `None` when the endpoint needs no authentication (proxy).
    pub api_key: Option<String>,
    /// BCP-47 language tag sent with every recognition request.
    pub language: String,
    /// Maximum seconds to wait for one recognition response.
    pub timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://speech.googleapis.com".into(),
            api_key: None,
            language: "en-US".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// RewriteConfig
// ---------------------------------------------------------------------------

/// Settings for the transcript rewrite collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Whether the rewrite stage runs at all. When `false` the pipeline
    /// uses the identity rewriter.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: String,
    /// API key — `None` for unauthenticated local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature. Low values keep the correction conservative.
    pub temperature: f32,
    /// Maximum seconds to wait for the batch rewrite response.
    pub timeout_secs: u64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the Cloud TTS REST endpoint.
    pub endpoint: String,
    /// API key — `None` when the endpoint needs no authentication.
    pub api_key: Option<String>,
    /// BCP-47 language tag for voice selection.
    pub language: String,
    /// Voice name.
    pub voice: String,
    /// Maximum seconds to wait for one synthesis response.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://texttospeech.googleapis.com".into(),
            api_key: None,
            language: "en-IN".into(),
            voice: "en-IN-Journey-F".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// MediaConfig
// ---------------------------------------------------------------------------

/// Paths to the media tool binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Nominal window length in seconds.
    pub window_secs: f64,
    /// What to do with windows whose synthesis failed.
    pub gap_policy: GapPolicy,
    /// Speech-to-text collaborator settings.
    pub stt: SttConfig,
    /// Transcript rewrite collaborator settings.
    pub rewrite: RewriteConfig,
    /// Text-to-speech collaborator settings.
    pub tts: TtsConfig,
    /// Media tool binaries.
    pub media: MediaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            gap_policy: GapPolicy::default(),
            stt: SttConfig::default(),
            rewrite: RewriteConfig::default(),
            tts: TtsConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet,
    /// so callers never special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests and `--config`).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default config survives a TOML round trip without data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.window_secs, loaded.window_secs);
        assert_eq!(original.gap_policy, loaded.gap_policy);

        assert_eq!(original.stt.endpoint, loaded.stt.endpoint);
        assert_eq!(original.stt.api_key, loaded.stt.api_key);
        assert_eq!(original.stt.language, loaded.stt.language);
        assert_eq!(original.stt.timeout_secs, loaded.stt.timeout_secs);

        assert_eq!(original.rewrite.enabled, loaded.rewrite.enabled);
        assert_eq!(original.rewrite.base_url, loaded.rewrite.base_url);
        assert_eq!(original.rewrite.model, loaded.rewrite.model);
        assert_eq!(original.rewrite.temperature, loaded.rewrite.temperature);

        assert_eq!(original.tts.voice, loaded.tts.voice);
        assert_eq!(original.tts.language, loaded.tts.language);

        assert_eq!(original.media.ffmpeg, loaded.media.ffmpeg);
        assert_eq!(original.media.ffprobe, loaded.media.ffprobe);
    }

    /// `load_from` on a missing path returns the default without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.window_secs, default.window_secs);
        assert_eq!(config.stt.language, default.stt.language);
        assert_eq!(config.rewrite.model, default.rewrite.model);
        assert_eq!(config.tts.voice, default.tts.voice);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.window_secs, 1.0);
        assert_eq!(cfg.gap_policy, GapPolicy::FillSilence);
        assert_eq!(cfg.stt.language, "en-US");
        assert!(cfg.stt.api_key.is_none());
        assert!(cfg.rewrite.enabled);
        assert_eq!(cfg.tts.voice, "en-IN-Journey-F");
        assert_eq!(cfg.media.ffmpeg, "ffmpeg");
    }
}

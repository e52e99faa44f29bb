//! Cloud TTS REST synthesizer.
//!
//! [`GoogleSynthesizer`] posts to the `text:synthesize` endpoint requesting
//! LINEAR16 output and decodes the base64 WAV from `audioContent`. Voice and
//! language selection come from [`TtsConfig`].

use async_trait::async_trait;
use base64::Engine as _;

use crate::audio::{read_wav_bytes, PcmBuffer};
use crate::config::TtsConfig;
use crate::tts::engine::{TextToSpeech, TtsError};

// ---------------------------------------------------------------------------
// GoogleSynthesizer
// ---------------------------------------------------------------------------

/// Text-to-speech client for the Cloud TTS `text:synthesize` REST API.
pub struct GoogleSynthesizer {
    client: reqwest::Client,
    config: TtsConfig,
}

impl GoogleSynthesizer {
    /// Build a synthesizer from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TextToSpeech for GoogleSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<PcmBuffer, TtsError> {
        let body = serde_json::json!({
            "input": { "text": text },
            "voice": {
                "languageCode": self.config.language,
                "name": self.config.voice,
            },
            "audioConfig": { "audioEncoding": "LINEAR16" },
        });

        let url = format!("{}/v1/text:synthesize", self.config.endpoint);
        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.query(&[("key", key)]);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(e.to_string()))?;

        let content = json["audioContent"]
            .as_str()
            .ok_or_else(|| TtsError::Parse("response has no audioContent".into()))?;

        let wav_bytes = base64::engine::general_purpose::STANDARD
            .decode(content)
            .map_err(|e| TtsError::Decode(e.to_string()))?;

        read_wav_bytes(&wav_bytes).map_err(|e| TtsError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> TtsConfig {
        TtsConfig {
            endpoint: "https://texttospeech.googleapis.com".into(),
            api_key: Some("key-123".into()),
            language: "en-IN".into(),
            voice: "en-IN-Journey-F".into(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _ = GoogleSynthesizer::from_config(&make_config());
    }

    #[test]
    fn synthesizer_is_object_safe() {
        let s: Box<dyn TextToSpeech> = Box::new(GoogleSynthesizer::from_config(&make_config()));
        drop(s);
    }
}

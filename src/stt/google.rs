//! Cloud Speech REST transcriber.
//!
//! [`GoogleTranscriber`] posts one window's audio to the
//! `speech:recognize` endpoint as base64 LINEAR16 content and concatenates
//! the top alternative of every result segment, in response order. A window
//! with no recognized speech returns an empty transcript.

use async_trait::async_trait;
use base64::Engine as _;

use crate::audio::{PcmBuffer, TRACK_RATE};
use crate::config::SttConfig;
use crate::stt::engine::{SpeechToText, SttError};

// ---------------------------------------------------------------------------
// GoogleTranscriber
// ---------------------------------------------------------------------------

/// Speech-to-text client for the Cloud Speech `speech:recognize` REST API.
///
/// All connection details (`endpoint`, `api_key`, `language`) come from the
/// [`SttConfig`] passed to [`GoogleTranscriber::from_config`]; the client is
/// injected into the pipeline at construction time — no ambient globals.
pub struct GoogleTranscriber {
    client: reqwest::Client,
    config: SttConfig,
}

impl GoogleTranscriber {
    /// Build a transcriber from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`, so one stalled call cannot hang the run.
    pub fn from_config(config: &SttConfig) -> Self {
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
impl SpeechToText for GoogleTranscriber {
    async fn transcribe(&self, audio: &PcmBuffer) -> Result<String, SttError> {
        if audio.sample_rate != TRACK_RATE {
            return Err(SttError::InvalidFormat(audio.sample_rate));
        }

        let content = base64::engine::general_purpose::STANDARD.encode(audio.to_le_bytes());

        let body = serde_json::json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": TRACK_RATE,
                "languageCode": self.config.language,
            },
            "audio": { "content": content },
        });

        let url = format!("{}/v1/speech:recognize", self.config.endpoint);
        let mut req = self.client.post(&url).json(&body);

        // Attach the API key only when configured — a proxy endpoint may not
        // need one.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.query(&[("key", key)]);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SttError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SttError::Parse(e.to_string()))?;

        // `results` is absent entirely for silence — an empty transcript,
        // not an error.
        let Some(results) = json["results"].as_array() else {
            return Ok(String::new());
        };

        let mut transcript = String::new();
        for result in results {
            if let Some(text) = result["alternatives"][0]["transcript"].as_str() {
                transcript.push_str(text);
            }
        }

        Ok(transcript)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> SttConfig {
        SttConfig {
            endpoint: "https://speech.googleapis.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            language: "en-US".into(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _ = GoogleTranscriber::from_config(&make_config(None));
        let _ = GoogleTranscriber::from_config(&make_config(Some("key-123")));
    }

    /// GoogleTranscriber must be usable as `dyn SpeechToText`.
    #[test]
    fn transcriber_is_object_safe() {
        let t: Box<dyn SpeechToText> =
            Box::new(GoogleTranscriber::from_config(&make_config(None)));
        drop(t);
    }

    #[tokio::test]
    async fn rejects_non_track_rate_audio() {
        let t = GoogleTranscriber::from_config(&make_config(None));
        let audio = PcmBuffer::silence(100, 44_100);
        let err = t.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, SttError::InvalidFormat(44_100)));
    }
}

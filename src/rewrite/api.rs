//! `ApiRewriter` — batch rewrite via an OpenAI-compatible chat endpoint.
//!
//! The whole transcript goes out as one `/v1/chat/completions` request with
//! `key: text` lines in window order, and the answer is parsed line by line
//! back into a [`Transcript`]. Works with OpenAI, Azure OpenAI behind a
//! compatible gateway, Groq, Ollama (OpenAI mode), vLLM — all connection
//! details come from [`RewriteConfig`]; nothing is hardcoded.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::config::RewriteConfig;
use crate::rewrite::rewriter::{RewriteError, TranscriptRewriter};
use crate::rewrite::{prompt, wire};
use crate::timeline::{TimeWindow, Transcript};

/// The completion must carry the whole corrected batch.
const MAX_TOKENS: u32 = 4_096;

// ---------------------------------------------------------------------------
// ApiRewriter
// ---------------------------------------------------------------------------

/// Rewrites a transcript with a single chat-completions request.
pub struct ApiRewriter {
    client: reqwest::Client,
    config: RewriteConfig,
}

impl ApiRewriter {
    /// Build a rewriter from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &RewriteConfig) -> Self {
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
impl TranscriptRewriter for ApiRewriter {
    /// Send the whole transcript for correction in one request.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string, so unauthenticated local
    /// providers work too.
    async fn rewrite(&self, transcript: &Transcript) -> Result<Transcript, RewriteError> {
        if transcript.is_empty() {
            return Ok(transcript.clone());
        }

        let batch = wire::format_lines(transcript);
        let (system_msg, user_msg) = prompt::build_chat(&batch);

        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  MAX_TOKENS
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RewriteError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(RewriteError::EmptyResponse)?;

        Ok(apply_response(transcript, content))
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Map the collaborator's line-formatted answer onto the original window
/// sequence.
///
/// * Blank lines and lines without a `": "` separator are skipped.
/// * Keys that don't resolve to a window of `transcript` are logged and
///   dropped.
/// * Windows absent from the response stay absent in the result — absence
///   means "synthesize silence" downstream, it is never turned into an
///   empty-string entry here.
fn apply_response(transcript: &Transcript, content: &str) -> Transcript {
    let known: HashSet<TimeWindow> = transcript.windows().iter().copied().collect();
    let mut rewritten = Transcript::new(transcript.windows().to_vec());

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, text)) = wire::parse_line(line) else {
            log::debug!("rewrite: skipping non-payload line {line:?}");
            continue;
        };
        match wire::parse_key(key) {
            Some(window) if known.contains(&window) => {
                rewritten.insert(window, text.to_string());
            }
            _ => {
                log::warn!("rewrite: response contained unknown window key {key:?}");
            }
        }
    }

    rewritten
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::partition;

    fn make_config(api_key: Option<&str>) -> RewriteConfig {
        RewriteConfig {
            enabled: true,
            base_url: "https://api.openai.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }

    fn two_window_transcript() -> (Vec<TimeWindow>, Transcript) {
        let windows = partition(2.0, 1.0).unwrap();
        let mut t = Transcript::new(windows.clone());
        t.insert(windows[0], "hello".into());
        t.insert(windows[1], "um".into());
        (windows, t)
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _ = ApiRewriter::from_config(&make_config(None));
        let _ = ApiRewriter::from_config(&make_config(Some("sk-test")));
    }

    #[test]
    fn rewriter_is_object_safe() {
        let r: Box<dyn TranscriptRewriter> =
            Box::new(ApiRewriter::from_config(&make_config(None)));
        drop(r);
    }

    /// An omitted window stays absent — it is not mapped to an empty string.
    #[test]
    fn omitted_window_stays_absent() {
        let (windows, t) = two_window_transcript();

        let out = apply_response(&t, "0-1: hello");

        assert_eq!(out.get(&windows[0]), Some("hello"));
        assert_eq!(out.get(&windows[1]), None);
        assert!(!out.contains(&windows[1]));
    }

    /// The result preserves the original window sequence even when the
    /// response reorders its lines.
    #[test]
    fn response_order_does_not_affect_window_order() {
        let (windows, t) = two_window_transcript();

        let out = apply_response(&t, "1-2: second\n0-1: first");

        assert_eq!(out.windows(), &windows[..]);
        let texts: Vec<_> = out.iter().map(|(_, txt)| txt.unwrap()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn unknown_keys_and_chatter_are_dropped() {
        let (windows, t) = two_window_transcript();

        let out = apply_response(
            &t,
            "Here are the corrections:\n\n0-1: hello\n7-8: stray\nnot a line",
        );

        assert_eq!(out.get(&windows[0]), Some("hello"));
        assert_eq!(out.get(&windows[1]), None);
    }

    /// A blanked-out entry (key with empty text) is kept as an empty string,
    /// which also synthesizes as silence downstream.
    #[test]
    fn blanked_entry_is_kept_empty() {
        let (windows, t) = two_window_transcript();

        let out = apply_response(&t, "0-1: hello\n1-2: ");

        assert_eq!(out.get(&windows[1]), Some(""));
    }

    #[tokio::test]
    async fn empty_transcript_short_circuits_without_a_request() {
        // base_url points nowhere; an HTTP attempt would error.
        let rewriter = ApiRewriter::from_config(&RewriteConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..make_config(None)
        });
        let t = Transcript::new(Vec::new());
        let out = rewriter.rewrite(&t).await.unwrap();
        assert!(out.is_empty());
    }
}

//! Core [`TranscriptRewriter`] trait and the no-op identity implementation.
//!
//! The rewrite stage is pluggable: the pipeline must work without a rewrite
//! collaborator configured, so [`IdentityRewriter`] is a drop-in alternative
//! to [`ApiRewriter`](crate::rewrite::ApiRewriter) that passes the
//! transcript through unchanged.

use async_trait::async_trait;
use thiserror::Error;

use crate::timeline::Transcript;

// ---------------------------------------------------------------------------
// RewriteError
// ---------------------------------------------------------------------------

/// Errors raised by the batch rewrite boundary.
///
/// Any of these aborts the whole batch — correction is a single combined
/// request, there is no per-window fallback.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// HTTP transport or connection error.
    #[error("rewrite request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("rewrite request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("rewrite service returned {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse rewrite response: {0}")]
    Parse(String),

    /// The response carried no usable text content.
    #[error("rewrite service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for RewriteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RewriteError::Timeout
        } else {
            RewriteError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptRewriter trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the rewrite collaborator.
///
/// # Contract
///
/// The returned transcript spans the same ordered window sequence as the
/// input. Its text map may be smaller: a window the collaborator dropped has
/// no entry, and downstream that absence means "synthesize silence".
/// Implementations never fabricate entries for omitted windows.
#[async_trait]
pub trait TranscriptRewriter: Send + Sync {
    /// Rewrite the whole transcript in one batch.
    async fn rewrite(&self, transcript: &Transcript) -> Result<Transcript, RewriteError>;
}

// Compile-time assertion: the trait must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TranscriptRewriter>) {}
};

// ---------------------------------------------------------------------------
// IdentityRewriter
// ---------------------------------------------------------------------------

/// Pass-through rewriter used when no rewrite collaborator is configured.
///
/// Never fails and never drops a window.
pub struct IdentityRewriter;

#[async_trait]
impl TranscriptRewriter for IdentityRewriter {
    async fn rewrite(&self, transcript: &Transcript) -> Result<Transcript, RewriteError> {
        Ok(transcript.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::partition;

    #[tokio::test]
    async fn identity_returns_the_transcript_unchanged() {
        let windows = partition(2.0, 1.0).unwrap();
        let mut t = Transcript::new(windows.clone());
        t.insert(windows[0], "hello".into());
        t.insert(windows[1], "um".into());

        let out = IdentityRewriter.rewrite(&t).await.unwrap();

        assert_eq!(out.windows(), t.windows());
        assert_eq!(out.get(&windows[0]), Some("hello"));
        assert_eq!(out.get(&windows[1]), Some("um"));
    }

    #[test]
    fn identity_is_object_safe() {
        let _: Box<dyn TranscriptRewriter> = Box::new(IdentityRewriter);
    }
}

//! Transcript rewrite boundary.
//!
//! * [`TranscriptRewriter`] — async trait over the whole-batch rewrite.
//! * [`ApiRewriter`] — OpenAI-compatible chat-completions implementation.
//! * [`IdentityRewriter`] — no-op pass-through when no collaborator is
//!   configured.
//! * [`wire`] — the single `"start-end: text"` serialization boundary.
//! * [`prompt`] — batch-correction prompt construction.

pub mod api;
pub mod prompt;
pub mod rewriter;
pub mod wire;

pub use api::ApiRewriter;
pub use rewriter::{IdentityRewriter, RewriteError, TranscriptRewriter};

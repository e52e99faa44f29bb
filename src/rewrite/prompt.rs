//! Prompt construction for the batch transcript rewrite.
//!
//! One chat request carries the whole transcript as `key: text` lines. The
//! instructions pin down the three behaviours the parser depends on: answer
//! in the same line format, never lengthen the text, and drop or blank the
//! lines that are pure filler.

/// System instruction for the rewrite collaborator.
const SYSTEM_INSTRUCTION: &str = "\
You are a transcript correction assistant for a video re-dubbing pipeline.
You receive one transcript line per time window in the form 'start-end: text'.

Rules:
1. Fix transcription errors minimally; never change the meaning.
2. Do not make any line longer than it already is.
3. Remove filler words (um, uh, ah, you know, etc.).
4. If a line is entirely filler, omit it or return an empty text for it.
5. Keep the exact 'start-end: corrected text' line format, one line per
   window, in the same order. No explanations, no extra lines.";

/// Build the `(system, user)` message pair for one batch request.
///
/// `batch` is the transcript serialized by
/// [`format_lines`](crate::rewrite::wire::format_lines).
pub fn build_chat(batch: &str) -> (&'static str, String) {
    let user = format!("Transcript windows:\n{batch}");
    (SYSTEM_INSTRUCTION, user)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

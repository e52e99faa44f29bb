//! Ordered per-window transcript collection.
//!
//! [`Transcript`] pairs an explicit ordered sequence of windows with a text
//! map. The sequence, not the map, defines iteration order — downstream
//! assembly depends on temporal order, so order is never inferred from map
//! internals.
//!
//! After the rewrite stage the map may be *sparse*: a window that the rewrite
//! collaborator dropped (judged pure filler) has no entry, and absence means
//! "synthesize silence". [`Transcript::get`] therefore returns `Option` and
//! never fabricates an empty string.

use std::collections::HashMap;

use crate::timeline::TimeWindow;

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Per-window text keyed by [`TimeWindow`], iterated in window order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    windows: Vec<TimeWindow>,
    text: HashMap<TimeWindow, String>,
}

impl Transcript {
    /// Create an empty transcript over the given ordered window sequence.
    pub fn new(windows: Vec<TimeWindow>) -> Self {
        Self {
            text: HashMap::with_capacity(windows.len()),
            windows,
        }
    }

    /// The ordered window sequence this transcript spans.
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Number of windows (not the number of text entries).
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Set the text for `window`.
    ///
    /// # Panics
    /// Panics when `window` is not part of this transcript's sequence —
    /// inserting a foreign window would silently corrupt assembly order.
    pub fn insert(&mut self, window: TimeWindow, text: String) {
        assert!(
            self.windows.contains(&window),
            "window {window} not in transcript"
        );
        self.text.insert(window, text);
    }

    /// The text for `window`, or `None` when the window has no entry
    /// (dropped by the rewrite stage, or never transcribed).
    pub fn get(&self, window: &TimeWindow) -> Option<&str> {
        self.text.get(window).map(String::as_str)
    }

    /// Whether `window` has a text entry at all.
    pub fn contains(&self, window: &TimeWindow) -> bool {
        self.text.contains_key(window)
    }

    /// Number of windows that carry non-blank text.
    pub fn spoken_windows(&self) -> usize {
        self.text.values().filter(|t| !t.trim().is_empty()).count()
    }

    /// Iterate `(window, text)` in window order. Windows without an entry
    /// yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&TimeWindow, Option<&str>)> {
        self.windows
            .iter()
            .map(|w| (w, self.text.get(w).map(String::as_str)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

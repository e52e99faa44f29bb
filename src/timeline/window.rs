//! Time windows and timeline partitioning.
//!
//! A [`TimeWindow`] is the unit of work for the whole pipeline: one window is
//! extracted, transcribed, rewritten and resynthesized as a unit. Bounds are
//! stored in **milliseconds** so the type is `Eq + Hash + Ord` and can serve
//! as a stable key across every stage (the `"start-end"` string form exists
//! only at the rewrite wire boundary, see [`crate::rewrite::wire`]).

use thiserror::Error;

// ---------------------------------------------------------------------------
// WindowError
// ---------------------------------------------------------------------------

/// Errors raised while partitioning a timeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    /// The media's total duration was zero or negative.
    #[error("invalid media duration: {0} s (must be > 0)")]
    InvalidDuration(f64),

    /// The requested window length was zero, negative, or below 1 ms.
    #[error("invalid window length: {0} s (must be >= 0.001)")]
    InvalidWindowLength(f64),
}

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

/// A half-open interval `[start_ms, end_ms)` of the media timeline.
///
/// Identity is the `(start_ms, end_ms)` pair; ordering follows the start
/// bound, which is also temporal order because windows never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeWindow {
    /// Start of the window, milliseconds from the beginning of the media.
    pub start_ms: u64,
    /// End of the window, milliseconds. Always greater than `start_ms`.
    pub end_ms: u64,
}

impl TimeWindow {
    /// Construct a window from millisecond bounds.
    ///
    /// # Panics
    /// Panics when `end_ms <= start_ms` — such a window is a programming
    /// error, never valid input.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        assert!(end_ms > start_ms, "degenerate window {start_ms}..{end_ms}");
        Self { start_ms, end_ms }
    }

    /// Window length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Start bound in seconds.
    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// End bound in seconds.
    pub fn end_secs(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s..{:.3}s", self.start_secs(), self.end_secs())
    }
}

// ---------------------------------------------------------------------------
// partition
// ---------------------------------------------------------------------------

/// Partition `[0, total_secs)` into contiguous windows of `window_secs`.
///
/// Produces `ceil(total / window)` windows. Every window but the last has
/// exactly the nominal length; the last is truncated to the remaining
/// duration and may be shorter. The result is strictly ordered, gapless,
/// starts at 0 and ends at the total duration.
///
/// Durations are rounded to whole milliseconds before splitting.
///
/// # Errors
/// - [`WindowError::InvalidDuration`] when `total_secs <= 0`.
/// - [`WindowError::InvalidWindowLength`] when `window_secs` rounds below
///   1 ms.
pub fn partition(total_secs: f64, window_secs: f64) -> Result<Vec<TimeWindow>, WindowError> {
    if !(total_secs > 0.0) {
        return Err(WindowError::InvalidDuration(total_secs));
    }

    let total_ms = (total_secs * 1000.0).round() as u64;
    let window_ms = (window_secs * 1000.0).round() as u64;

    if !(window_secs > 0.0) || window_ms == 0 {
        return Err(WindowError::InvalidWindowLength(window_secs));
    }
    if total_ms == 0 {
        return Err(WindowError::InvalidDuration(total_secs));
    }

    let mut windows = Vec::with_capacity(total_ms.div_ceil(window_ms) as usize);
    let mut start = 0u64;
    while start < total_ms {
        let end = (start + window_ms).min(total_ms);
        windows.push(TimeWindow::new(start, end));
        start = end;
    }

    Ok(windows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

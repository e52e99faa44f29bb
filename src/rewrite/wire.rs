//! The batch-rewrite wire format.
//!
//! This is the single place where a [`TimeWindow`] is serialized as a string
//! key and parsed back. The format is one line per window, in window order:
//!
//! ```text
//! <start>-<end>: <text>
//! ```
//!
//! with bounds in seconds, trailing zeros trimmed (`0-1`, `10-10.5`). The
//! rewrite collaborator answers in the same line format and may omit lines;
//! omission is meaningful and handled by the caller.

use crate::timeline::{TimeWindow, Transcript};

/// Separator between the window key and the text.
const KEY_SEPARATOR: &str = ": ";

// ---------------------------------------------------------------------------
// Key formatting / parsing
// ---------------------------------------------------------------------------

/// Format a window key: bounds in seconds, shortest decimal form.
pub fn format_key(window: &TimeWindow) -> String {
    format!("{}-{}", fmt_secs(window.start_ms), fmt_secs(window.end_ms))
}

fn fmt_secs(ms: u64) -> String {
    // f64 Display prints the shortest round-trip form: 1000 → "1",
    // 10_500 → "10.5".
    format!("{}", ms as f64 / 1000.0)
}

/// Parse a window key back into a [`TimeWindow`].
///
/// Returns `None` for anything that is not two `-`-separated non-negative
/// second values with `end > start`.
pub fn parse_key(key: &str) -> Option<TimeWindow> {
    let (start, end) = key.split_once('-')?;
    let start_secs: f64 = start.trim().parse().ok()?;
    let end_secs: f64 = end.trim().parse().ok()?;
    if !(start_secs >= 0.0) || !(end_secs > start_secs) {
        return None;
    }
    Some(TimeWindow {
        start_ms: (start_secs * 1000.0).round() as u64,
        end_ms: (end_secs * 1000.0).round() as u64,
    })
}

// ---------------------------------------------------------------------------
// Line formatting / parsing
// ---------------------------------------------------------------------------

/// Serialize a transcript as one `key: text` line per window, in window
/// order. Windows without a text entry serialize with empty text.
pub fn format_lines(transcript: &Transcript) -> String {
    transcript
        .iter()
        .map(|(window, text)| {
            format!("{}{}{}", format_key(window), KEY_SEPARATOR, text.unwrap_or(""))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a response line on the first `": "` into `(key, text)`.
///
/// Returns `None` for lines without the separator (chatter around the
/// payload, markdown fences and the like).
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, text) = line.split_once(KEY_SEPARATOR)?;
    Some((key.trim(), text))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::partition;

    #[test]
    fn whole_second_keys_have_no_decimals() {
        let w = TimeWindow::new(0, 1000);
        assert_eq!(format_key(&w), "0-1");
        let w = TimeWindow::new(9000, 10_000);
        assert_eq!(format_key(&w), "9-10");
    }

    #[test]
    fn fractional_keys_trim_trailing_zeros() {
        let w = TimeWindow::new(10_000, 10_500);
        assert_eq!(format_key(&w), "10-10.5");
    }

    #[test]
    fn key_round_trip() {
        for w in partition(10.5, 1.0).unwrap() {
            assert_eq!(parse_key(&format_key(&w)), Some(w));
        }
    }

    #[test]
    fn parse_key_rejects_malformed_input() {
        for bad in ["", "1", "a-b", "2-1", "1-1", "-1-2", "1-"] {
            assert_eq!(parse_key(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn format_lines_follows_window_order() {
        let windows = partition(2.0, 1.0).unwrap();
        let mut t = Transcript::new(windows.clone());
        t.insert(windows[1], "world".into());
        t.insert(windows[0], "hello".into());

        assert_eq!(format_lines(&t), "0-1: hello\n1-2: world");
    }

    #[test]
    fn format_lines_serializes_missing_text_as_empty() {
        let windows = partition(2.0, 1.0).unwrap();
        let mut t = Transcript::new(windows.clone());
        t.insert(windows[0], "hello".into());

        assert_eq!(format_lines(&t), "0-1: hello\n1-2: ");
    }

    #[test]
    fn parse_line_splits_on_first_separator_only() {
        assert_eq!(
            parse_line("0-1: note: with colon"),
            Some(("0-1", "note: with colon"))
        );
    }

    #[test]
    fn parse_line_rejects_lines_without_separator() {
        assert_eq!(parse_line("Here are your corrections"), None);
        assert_eq!(parse_line("0-1:no-space"), None);
    }
}

//! Shared helpers for golden tests: snapshot formatting, fixture loading and
//! readable line diffs.

pub mod fixtures;
pub mod snapshot;

pub use fixtures::{FixtureCase, load_cases};
pub use snapshot::{format_entries, format_tree};

/// Quote `text` on one line, escaping control characters.
pub fn escape_text(text: &str) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{00A0}' => out.push_str("\\u{A0}"),
            ch if ch.is_control() => {
                let _ = write!(&mut out, "\\u{{{:X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Describe the first mismatching line with a little surrounding context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    const MISSING: &str = "<missing>";
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    fn line(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or(MISSING)
    }

    match (0..max).find(|&i| line(expected, i) != line(actual, i)) {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(&mut out, "first mismatch at line {}:", i + 1);
            for idx in start..end {
                let marker = if idx == i { ">" } else { " " };
                let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
                let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
            }
        }
        None => {
            let _ = writeln!(&mut out, "no mismatching line");
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_quotes_and_escapes_controls() {
        assert_eq!(escape_text("a\"b\nc"), "\"a\\\"b\\nc\"");
        assert_eq!(escape_text("x\u{1}"), "\"x\\u{1}\"");
        assert_eq!(escape_text("a\u{00A0}b"), "\"a\\u{A0}b\"");
    }

    #[test]
    fn diff_lines_marks_missing_lines() {
        let expected = vec!["a".to_string()];
        let actual = vec!["a".to_string(), "extra".to_string()];
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("expected: <missing>"), "{diff}");
        assert!(diff.contains("actual: extra"), "{diff}");
    }

    #[test]
    fn diff_lines_points_at_first_mismatch() {
        let expected = vec!["a".to_string(), "b".to_string()];
        let actual = vec!["a".to_string(), "c".to_string(), "d".to_string()];
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("first mismatch at line 2"), "{diff}");
        assert!(diff.contains("expected 2 lines, actual 3 lines"), "{diff}");
    }
}

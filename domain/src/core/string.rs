//! String utilities for the domain layer.

/// Single-line preview of `s` with at most `max_chars` characters.
///
/// Newlines are folded into spaces and an ellipsis marks truncation, so the
/// result is safe to embed in a log line or a one-row listing.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let flat = flat.trim();

    if flat.chars().count() <= max_chars {
        return flat.to_string();
    }

    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_newlines_are_folded() {
        assert_eq!(preview("line one\nline two", 40), "line one line two");
    }

    #[test]
    fn test_long_text_is_truncated() {
        assert_eq!(preview("hello world", 8), "hello...");
    }

    #[test]
    fn test_multibyte_counts_characters() {
        assert_eq!(preview("日本語テスト", 6), "日本語テスト");
        assert_eq!(preview("日本語テスト文字列", 6), "日本語...");
    }
}

//! Common utilities and helper functions

pub mod error;

/// Truncate text to at most `max_chars` characters, appending `...` when cut
///
/// Counts characters, not bytes, so Korean text never splits mid-codepoint.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Collapse a multi-line text to one line for terminal listings
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

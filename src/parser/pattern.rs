//! Ordered regex fallback chains
//!
//! Upstream markup is unversioned and several generations of it coexist, so
//! each logical field is described by an ordered list of [`FieldPattern`]s,
//! from the most specific current markup down to the most generic fallback.
//! Evaluation stops at the first pattern whose capture survives validation;
//! later patterns are never attempted.

use regex::Regex;
use std::fmt;

use crate::parser::sanitize::clean_field;

/// Validator applied to a cleaned capture
pub type Validator = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// One candidate extraction pattern for a field
pub struct FieldPattern {
    regex: Regex,
    group_index: usize,
    validate: Validator,
}

impl FieldPattern {
    /// Pattern using capture group 1 and accepting any non-empty value
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regex. Pattern tables are static,
    /// so this surfaces on first use in tests.
    pub fn new(pattern: &str) -> Self {
        Self::with_group(pattern, 1)
    }

    /// Pattern using the given capture group
    pub fn with_group(pattern: &str, group_index: usize) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid field pattern {pattern}: {e}")),
            group_index,
            validate: Box::new(|_| true),
        }
    }

    /// Attach a validator; rejected captures fall through to the next pattern
    #[must_use]
    pub fn validate(mut self, validate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Box::new(validate);
        self
    }

    /// Try this pattern alone: capture, clean, validate
    pub fn try_match(&self, html: &str) -> Option<String> {
        let raw = self.regex.captures(html)?.get(self.group_index)?.as_str();
        if raw.trim().is_empty() {
            return None;
        }

        let cleaned = clean_field(raw);
        if cleaned.is_empty() || !(self.validate)(&cleaned) {
            return None;
        }

        Some(cleaned)
    }

    /// Source regex, for diagnostics
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPattern")
            .field("regex", &self.regex.as_str())
            .field("group_index", &self.group_index)
            .finish_non_exhaustive()
    }
}

/// Return the first accepted match and the index of the pattern that won
pub fn extract_field_indexed(html: &str, patterns: &[FieldPattern]) -> Option<(usize, String)> {
    patterns
        .iter()
        .enumerate()
        .find_map(|(idx, pattern)| pattern.try_match(html).map(|value| (idx, value)))
}

/// Return the first accepted, cleaned match, or `None` when every pattern fails
///
/// # Examples
///
/// ```
/// use ytfacts::parser::pattern::{extract_field, FieldPattern};
///
/// let patterns = vec![
///     FieldPattern::new(r#"<meta property="og:title" content="([^"]*)""#)
///         .validate(|v| v != "YouTube"),
///     FieldPattern::new(r"<title>([^<]*)</title>"),
/// ];
///
/// let html = r#"<meta property="og:title" content="YouTube"><title>Fallback</title>"#;
/// assert_eq!(extract_field(html, &patterns).as_deref(), Some("Fallback"));
/// ```
pub fn extract_field(html: &str, patterns: &[FieldPattern]) -> Option<String> {
    extract_field_indexed(html, patterns).map(|(_, value)| value)
}

/// Common validators
pub mod validators {
    /// Contains at least one ASCII digit
    pub fn has_digit(value: &str) -> bool {
        value.chars().any(|c| c.is_ascii_digit())
    }

    /// Absolute or protocol-relative http(s) URL
    pub fn is_url(value: &str) -> bool {
        value.starts_with("https://") || value.starts_with("http://") || value.starts_with("//")
    }

    /// Rejects the generic site title used as a placeholder on error pages
    pub fn not_placeholder_title(value: &str) -> bool {
        !value.eq_ignore_ascii_case("youtube") && value != "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(pattern: &str, counter: &Arc<AtomicUsize>) -> FieldPattern {
        let counter = Arc::clone(counter);
        FieldPattern::new(pattern).validate(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
    }

    #[test]
    fn test_short_circuit_after_first_accepted() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        let patterns = vec![
            counting(r"<missing>([^<]+)</missing>", &first),
            counting(r"<b>([^<]+)</b>", &second),
            counting(r"<i>([^<]+)</i>", &third),
        ];

        let html = "<b>second</b><i>third</i>";
        let result = extract_field_indexed(html, &patterns);

        assert_eq!(result, Some((1, "second".to_string())));
        assert_eq!(first.load(Ordering::SeqCst), 0, "no capture, validator not reached");
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0, "third pattern must never run");
    }

    #[test]
    fn test_rejected_capture_falls_through() {
        let patterns = vec![
            FieldPattern::new(r"<title>([^<]*)</title>")
                .validate(validators::not_placeholder_title),
            FieldPattern::new(r#""title":"([^"]+)""#),
        ];

        let html = r#"<title>YouTube</title><script>{"title":"채널 이름"}</script>"#;
        assert_eq!(extract_field(html, &patterns).as_deref(), Some("채널 이름"));
    }

    #[test]
    fn test_empty_capture_skipped() {
        let patterns = vec![
            FieldPattern::new(r#"content="([^"]*)""#),
            FieldPattern::new(r"<p>([^<]*)</p>"),
        ];

        let html = r#"<meta content="   "><p>본문</p>"#;
        assert_eq!(extract_field(html, &patterns).as_deref(), Some("본문"));
    }

    #[test]
    fn test_value_is_trimmed_and_decoded() {
        let patterns = vec![FieldPattern::new(r#""name":"([^"]+)""#)];
        let html = r#"{"name":"  Tom & Jerry  "}"#;
        assert_eq!(extract_field(html, &patterns).as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_all_patterns_fail() {
        let patterns = vec![
            FieldPattern::new(r"<x>([^<]+)</x>"),
            FieldPattern::new(r"<y>([^<]+)</y>"),
        ];
        assert_eq!(extract_field("<z>nothing</z>", &patterns), None);
        assert_eq!(extract_field("", &[]), None);
    }

    #[test]
    fn test_custom_group_index() {
        let patterns = vec![FieldPattern::with_group(r"(\w+)=(\w+)", 2)];
        assert_eq!(extract_field("key=value", &patterns).as_deref(), Some("value"));
    }

    #[test]
    fn test_missing_group_is_not_a_match() {
        let patterns = vec![FieldPattern::with_group(r"(a)|(b)", 2)];
        assert_eq!(extract_field("a", &patterns), None);
    }

    #[test]
    fn test_validators() {
        assert!(validators::has_digit("구독자 1.2만명"));
        assert!(!validators::has_digit("없음"));
        assert!(validators::is_url("https://yt3.ggpht.com/a"));
        assert!(validators::is_url("//yt3.ggpht.com/a"));
        assert!(!validators::is_url("data:image/png"));
        assert!(!validators::not_placeholder_title("YouTube"));
        assert!(validators::not_placeholder_title("YouTube Korea"));
    }
}

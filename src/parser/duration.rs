//! Video duration formatting
//!
//! ISO-8601 durations ("PT10M30S") and raw second counts both render as
//! `H:MM:SS` when there is at least one hour, `M:SS` otherwise.

use regex::Regex;
use std::sync::LazyLock;

static ISO8601_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

fn format_hms(hours: u64, minutes: u64, seconds: u64) -> String {
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Hours (days folded in), minutes and seconds; `None` when a component
/// or the folded hours overflow
fn fold_components(captures: &regex::Captures<'_>) -> Option<(u64, u64, u64)> {
    let component = |idx: usize| -> Option<u64> {
        match captures.get(idx) {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => Some(0),
        }
    };

    let hours = component(1)?.checked_mul(24)?.checked_add(component(2)?)?;
    Some((hours, component(3)?, component(4)?))
}

/// Format an ISO-8601 duration for display
///
/// Missing components count as zero. A day component is folded into hours.
/// Input that is not a duration, or whose total does not fit, is returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use ytfacts::parser::duration::parse_iso8601;
///
/// assert_eq!(parse_iso8601("PT10M30S"), "10:30");
/// assert_eq!(parse_iso8601("PT1H2M3S"), "1:02:03");
/// assert_eq!(parse_iso8601("LIVE"), "LIVE");
/// ```
pub fn parse_iso8601(duration: &str) -> String {
    let trimmed = duration.trim();
    // "P" alone is not a duration
    if trimmed.len() < 2 {
        return duration.to_string();
    }

    let Some(captures) = ISO8601_DURATION_REGEX.captures(trimmed) else {
        return duration.to_string();
    };

    let Some((hours, minutes, seconds)) = fold_components(&captures) else {
        return duration.to_string();
    };

    format_hms(hours, minutes, seconds)
}

/// Format a second count for display
///
/// Non-positive or missing input renders as `"0:00"`.
///
/// # Examples
///
/// ```
/// use ytfacts::parser::duration::parse_seconds;
///
/// assert_eq!(parse_seconds(3661), "1:01:01");
/// assert_eq!(parse_seconds(None), "0:00");
/// ```
pub fn parse_seconds(total_seconds: impl Into<Option<i64>>) -> String {
    let total = match total_seconds.into() {
        Some(total) if total > 0 => total as u64,
        _ => return "0:00".to_string(),
    };

    format_hms(total / 3600, (total % 3600) / 60, total % 60)
}

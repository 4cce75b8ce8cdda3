//! Abbreviated count parsing
//!
//! Turns display counts such as "구독자 6.2천명", "1.5만", "3.2K subscribers"
//! or "3,072" into integers. Korean (천/만/억) and English (K/M/B) unit
//! systems only.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static KOREAN_UNIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((\d+(?:\.\d+)?)\s*([천만억]))").unwrap());

// Unit must not be followed by an ASCII letter or digit ("5 Members"),
// while Korean suffixes ("1.5K회") are allowed.
static ENGLISH_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((\d+(?:\.\d+)?)\s*([KMB]))(?:[^A-Za-z0-9]|$)").unwrap()
});

static PLAIN_INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Result of parsing a count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedNumber {
    /// Parsed count, 0 when nothing usable was found
    pub value: u64,

    /// Portion of the separator-stripped input that produced `value`
    pub matched_text: Option<String>,
}

fn korean_multiplier(unit: &str) -> f64 {
    match unit {
        "천" => 1_000.0,
        "만" => 10_000.0,
        "억" => 100_000_000.0,
        _ => 1.0,
    }
}

fn english_multiplier(unit: &str) -> f64 {
    match unit.to_ascii_uppercase().as_str() {
        "K" => 1_000.0,
        "M" => 1_000_000.0,
        "B" => 1_000_000_000.0,
        _ => 1.0,
    }
}

/// Finite, non-negative and in range, else `None`
fn to_count(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value.round() as u64)
}

fn scaled(captures: &regex::Captures<'_>, multiplier: fn(&str) -> f64) -> Option<ParsedNumber> {
    let whole = captures.get(1)?;
    let decimal: f64 = captures.get(2)?.as_str().parse().ok()?;
    let unit = captures.get(3)?.as_str();
    let value = to_count(decimal * multiplier(unit))?;

    Some(ParsedNumber {
        value,
        matched_text: Some(whole.as_str().to_string()),
    })
}

/// Parse an abbreviated count, keeping the matched text
///
/// Unit patterns are tried before bare integers, Korean before English, so
/// "12K" is never read as 12.
///
/// # Examples
///
/// ```
/// use ytfacts::parser::number::parse_number;
///
/// let parsed = parse_number("구독자 1.5만명");
/// assert_eq!(parsed.value, 15_000);
/// assert_eq!(parsed.matched_text.as_deref(), Some("1.5만"));
/// ```
pub fn parse_number(text: &str) -> ParsedNumber {
    let stripped = text.replace(',', "");

    if let Some(parsed) = KOREAN_UNIT_REGEX
        .captures(&stripped)
        .and_then(|c| scaled(&c, korean_multiplier))
    {
        return parsed;
    }

    if let Some(parsed) = ENGLISH_UNIT_REGEX
        .captures(&stripped)
        .and_then(|c| scaled(&c, english_multiplier))
    {
        return parsed;
    }

    PLAIN_INTEGER_REGEX
        .find(&stripped)
        .and_then(|m| {
            let value = m.as_str().parse::<u64>().ok()?;
            Some(ParsedNumber {
                value,
                matched_text: Some(m.as_str().to_string()),
            })
        })
        .unwrap_or_default()
}

/// Parse an abbreviated count, 0 on failure
///
/// # Examples
///
/// ```
/// use ytfacts::parser::number::parse_count;
///
/// assert_eq!(parse_count("6.2천"), 6_200);
/// assert_eq!(parse_count("1.5M"), 1_500_000);
/// assert_eq!(parse_count("3,072"), 3_072);
/// assert_eq!(parse_count("abc"), 0);
/// ```
pub fn parse_count(text: &str) -> u64 {
    parse_number(text).value
}

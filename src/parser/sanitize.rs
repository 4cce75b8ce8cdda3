//! Text cleanup for values captured out of raw page text
//!
//! Captures come from two worlds: HTML attributes (entity-encoded) and the
//! JSON payloads embedded in script tags (backslash-escaped). Both get folded
//! into plain text here.

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Clean a captured field value
///
/// 1. Decode JSON string escapes
/// 2. Decode HTML entities
/// 3. Remove zero-width and control characters (newline/tab kept)
/// 4. Normalize whitespace, trim lines, collapse blank runs
///
/// # Examples
///
/// ```
/// use ytfacts::parser::sanitize::clean_field;
///
/// assert_eq!(clean_field(r"Tom \u0026 Jerry"), "Tom & Jerry");
/// assert_eq!(clean_field("Tom &amp; Jerry "), "Tom & Jerry");
/// ```
pub fn clean_field(text: &str) -> String {
    let mut result = decode_json_escapes(text);

    result = html_escape::decode_html_entities(&result).into_owned();
    result = remove_invisible(&result);
    result = WHITESPACE_REGEX.replace_all(&result, " ").to_string();
    result = trim_lines(&result);
    result = MULTI_NEWLINE_REGEX.replace_all(&result, "\n\n").to_string();

    result.trim().to_string()
}

/// Decode the escapes that appear inside JSON string literals
///
/// Unknown escapes are kept verbatim. Surrogate pairs are combined; a lone
/// surrogate becomes U+FFFD.
///
/// # Examples
///
/// ```
/// use ytfacts::parser::sanitize::decode_json_escapes;
///
/// assert_eq!(decode_json_escapes(r#"line\nnext \"quoted\""#), "line\nnext \"quoted\"");
/// assert_eq!(decode_json_escapes(r"\uac00"), "가");
/// ```
pub fn decode_json_escapes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') | Some('f') => {}
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('u') => {
                let Some(high) = read_hex4(&mut chars) else {
                    out.push_str("\\u");
                    continue;
                };
                if (0xD800..0xDC00).contains(&high) {
                    let low = read_low_surrogate(&mut chars);
                    let decoded = low
                        .and_then(|low| {
                            char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
                        })
                        .unwrap_or('\u{FFFD}');
                    out.push(decoded);
                } else {
                    out.push(char::from_u32(high).unwrap_or('\u{FFFD}'));
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut lookahead = chars.clone();
    let digits: String = lookahead.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    *chars = lookahead;
    u32::from_str_radix(&digits, 16).ok()
}

fn read_low_surrogate(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return None;
    }
    let low = read_hex4(&mut lookahead)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    *chars = lookahead;
    Some(low)
}

/// Remove zero-width characters, BOM and control characters except `\n`/`\t`
///
/// # Examples
///
/// ```
/// use ytfacts::parser::sanitize::remove_invisible;
///
/// assert_eq!(remove_invisible("가\u{200B}나\u{FEFF}다\x07"), "가나다");
/// ```
pub fn remove_invisible(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

fn trim_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

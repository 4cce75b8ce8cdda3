//! "N units ago" formatting
//!
//! Picks the coarsest unit whose floored count is non-zero, in strictly
//! descending order: years, months, days, hours, minutes, then "just now".
//! Only that one unit is shown.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::i18n::{self, t};

const SECONDS_PER_YEAR: i64 = 31_536_000;
const SECONDS_PER_MONTH: i64 = 2_592_000;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Unit chosen for a relative-time label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Years(i64),
    Months(i64),
    Days(i64),
    Hours(i64),
    Minutes(i64),
    JustNow,
}

impl RelativeUnit {
    /// Select the coarsest non-zero unit for an elapsed span
    pub fn from_elapsed(elapsed_secs: i64) -> Self {
        let thresholds: [(i64, fn(i64) -> Self); 5] = [
            (SECONDS_PER_YEAR, Self::Years),
            (SECONDS_PER_MONTH, Self::Months),
            (SECONDS_PER_DAY, Self::Days),
            (SECONDS_PER_HOUR, Self::Hours),
            (SECONDS_PER_MINUTE, Self::Minutes),
        ];

        thresholds
            .iter()
            .find_map(|(unit_secs, make)| {
                let count = elapsed_secs.div_euclid(*unit_secs);
                (count > 0).then(|| make(count))
            })
            .unwrap_or(Self::JustNow)
    }

    /// Render in the given locale ("ko" or "en")
    pub fn render(&self, locale: &str) -> String {
        let locale = i18n::normalize_locale(locale);
        let rendered = match *self {
            Self::Years(1) => t!("relative_time.years.one", locale = locale, count = 1),
            Self::Years(n) => t!("relative_time.years.other", locale = locale, count = n),
            Self::Months(1) => t!("relative_time.months.one", locale = locale, count = 1),
            Self::Months(n) => t!("relative_time.months.other", locale = locale, count = n),
            Self::Days(1) => t!("relative_time.days.one", locale = locale, count = 1),
            Self::Days(n) => t!("relative_time.days.other", locale = locale, count = n),
            Self::Hours(1) => t!("relative_time.hours.one", locale = locale, count = 1),
            Self::Hours(n) => t!("relative_time.hours.other", locale = locale, count = n),
            Self::Minutes(1) => t!("relative_time.minutes.one", locale = locale, count = 1),
            Self::Minutes(n) => t!("relative_time.minutes.other", locale = locale, count = n),
            Self::JustNow => t!("relative_time.just_now", locale = locale),
        };
        rendered.to_string()
    }
}

/// Parse RFC 3339, falling back to a naive timestamp read as UTC
fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let trimmed = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp relative to `now` in the given locale
///
/// Returns an empty string when the timestamp cannot be parsed; callers
/// treat empty as "omit". Future timestamps render as "just now".
pub fn format_relative_time_at(timestamp: &str, now: DateTime<Utc>, locale: &str) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        tracing::trace!(timestamp = %timestamp, "Unparseable timestamp");
        return String::new();
    };

    let elapsed = (now - then).num_seconds();
    RelativeUnit::from_elapsed(elapsed).render(locale)
}

/// Format a timestamp relative to the wall clock, in Korean
///
/// # Examples
///
/// ```
/// use ytfacts::parser::relative_time::format_relative_time;
///
/// assert_eq!(format_relative_time("not a date"), "");
/// ```
pub fn format_relative_time(timestamp: &str) -> String {
    format_relative_time_at(timestamp, Utc::now(), i18n::DEFAULT_LOCALE)
}

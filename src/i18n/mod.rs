//! Localization support
//!
//! Korean (ko) and English (en) only. Display strings for relative times and
//! error classes live in `locales/app.yml`.
//!
//! # Environment Variables
//!
//! - `YTFACTS_LANG`: preferred language (ko, en), read by `Config::from_env`.
//!   Defaults to Korean.

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "ko";

/// Set the process-wide locale for translations
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(normalized);
}

/// Normalize locale code to a supported one
///
/// - ko-KR, ko_KR, korean -> ko
/// - anything else -> en
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();

    if lower.starts_with("ko") || lower == "korean" {
        "ko"
    } else {
        "en"
    }
}

#[doc(inline)]
pub use rust_i18n::t;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("ko"), "ko");
        assert_eq!(normalize_locale("ko-KR"), "ko");
        assert_eq!(normalize_locale("ko_KR"), "ko");
        assert_eq!(normalize_locale("Korean"), "ko");

        assert_eq!(normalize_locale("en"), "en");
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("ja"), "en");
    }

    #[test]
    #[serial]
    fn test_set_locale_follows_latest_call() {
        set_locale("en-US");
        assert_eq!(&*rust_i18n::locale(), "en");

        set_locale("ko_KR");
        assert_eq!(&*rust_i18n::locale(), "ko");
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(t!("relative_time.just_now", locale = "ko"), "방금 전");
        assert_eq!(t!("relative_time.just_now", locale = "en"), "just now");
    }
}

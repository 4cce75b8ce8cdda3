//! Configuration management for ytfacts
//!
//! Loaded from environment variables or a TOML file; every value has a
//! default that works against the public site.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::CommentSort;

/// Desktop Chrome User-Agent; upstream serves the full page markup to it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept-Language sent with channel page requests
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Consent cookie that skips the region consent interstitial
pub const DEFAULT_CONSENT_COOKIE: &str = "CONSENT=YES+cb.20210328-17-p0.en+FX+100";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel page scraping
    pub scraper: ScraperConfig,

    /// Comments backend
    pub comments: CommentsConfig,

    /// Display formatting
    pub display: DisplayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Channel page scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL for handles and channel ids
    pub base_url: String,

    /// User agent string
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Consent cookie value
    pub consent_cookie: String,

    /// Interface language query parameter (`hl`)
    pub host_language: String,

    /// Region query parameter (`gl`)
    pub region: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Yield to the runtime between extraction steps
    pub yield_between_steps: bool,
}

/// Comments backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// Comments endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Default sort order
    pub default_sort: CommentSort,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Locale for relative times and messages (ko, en)
    pub locale: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://www.youtube.com"),
            user_agent: String::from(DEFAULT_USER_AGENT),
            accept_language: String::from(DEFAULT_ACCEPT_LANGUAGE),
            consent_cookie: String::from(DEFAULT_CONSENT_COOKIE),
            host_language: String::from("ko"),
            region: String::from("KR"),
            request_timeout_secs: 30,
            yield_between_steps: true,
        }
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("http://127.0.0.1:54321/functions/v1/youtube-comments"),
            request_timeout_secs: 30,
            default_sort: CommentSort::Top,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: String::from(crate::i18n::DEFAULT_LOCALE),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            comments: CommentsConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("YTFACTS_BASE_URL") {
            config.scraper.base_url = base_url;
        }
        if let Ok(user_agent) = std::env::var("YTFACTS_USER_AGENT") {
            config.scraper.user_agent = user_agent;
        }
        if let Ok(cookie) = std::env::var("YTFACTS_CONSENT_COOKIE") {
            config.scraper.consent_cookie = cookie;
        }
        if let Some(timeout) = env_parse::<u64>("YTFACTS_REQUEST_TIMEOUT") {
            config.scraper.request_timeout_secs = timeout;
            config.comments.request_timeout_secs = timeout;
        }
        if let Some(yield_steps) = env_parse::<bool>("YTFACTS_YIELD_BETWEEN_STEPS") {
            config.scraper.yield_between_steps = yield_steps;
        }

        if let Ok(endpoint) = std::env::var("YTFACTS_COMMENTS_ENDPOINT") {
            config.comments.endpoint = endpoint;
        }
        if let Some(sort) = std::env::var("YTFACTS_COMMENT_SORT")
            .ok()
            .and_then(|v| CommentSort::parse(&v))
        {
            config.comments.default_sort = sort;
        }

        if let Ok(locale) = std::env::var("YTFACTS_LANG") {
            config.display.locale = crate::i18n::normalize_locale(&locale).to_string();
        }

        if let Ok(level) = std::env::var("YTFACTS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("YTFACTS_LOG_FORMAT") {
            config.logging.format = format;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scraper.request_timeout_secs == 0 || self.comments.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        url::Url::parse(&self.scraper.base_url)
            .with_context(|| format!("Invalid scraper base_url: {}", self.scraper.base_url))?;

        url::Url::parse(&self.comments.endpoint)
            .with_context(|| format!("Invalid comments endpoint: {}", self.comments.endpoint))?;

        if self.scraper.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Channel page request timeout
    #[must_use]
    pub fn scraper_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.request_timeout_secs)
    }

    /// Comments request timeout
    #[must_use]
    pub fn comments_timeout(&self) -> Duration {
        Duration::from_secs(self.comments.request_timeout_secs)
    }
}

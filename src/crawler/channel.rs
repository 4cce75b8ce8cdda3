//! Channel page scraper
//!
//! One GET for the channel page, then the extraction steps in
//! [`ChannelStep::ALL`] order over the same body. The scraper yields to the
//! runtime between steps so a large page never monopolizes a worker.

use url::Url;

use crate::config::ScraperConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::headers::build_channel_headers;
use crate::error::Result;
use crate::models::ScrapedChannelData;
use crate::parser::channel::{ChannelExtractor, ChannelStep};
use crate::utils::error::FetchError;

/// Query parameters forced onto every channel page request
const LOCALE_PARAMS: [&str; 3] = ["hl", "persist_hl", "gl"];

/// Scrapes facts from a channel page
pub struct ChannelScraper {
    fetcher: PageFetcher,
    extractor: ChannelExtractor,
    config: ScraperConfig,
}

impl ChannelScraper {
    /// Create a scraper from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: ScraperConfig) -> std::result::Result<Self, FetchError> {
        let fetcher = PageFetcher::with_timeout(std::time::Duration::from_secs(
            config.request_timeout_secs,
        ))?;
        Ok(Self {
            fetcher,
            extractor: ChannelExtractor::new(),
            config,
        })
    }

    /// Create a scraper with default settings and a custom base URL for testing
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_base_url(base_url: &str) -> std::result::Result<Self, FetchError> {
        let config = ScraperConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..ScraperConfig::default()
        };
        Self::new(config)
    }

    /// Resolve user input to a channel page URL with locale parameters
    ///
    /// Accepts a handle (`@name` or bare `name`), a channel id (`UC...`), a
    /// site-relative path (`/c/name`) or a full URL.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for empty or unparseable input
    pub fn channel_url(&self, input: &str) -> std::result::Result<Url, FetchError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FetchError::InvalidUrl("empty channel reference".to_string()));
        }

        let base = Url::parse(&self.config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.config.base_url)))?;

        let path = if input.starts_with("http://") || input.starts_with("https://") {
            return self.with_locale_params(parse_url(input)?);
        } else if input.starts_with("www.") || input.starts_with("youtube.com") || input.starts_with("m.youtube.com") {
            return self.with_locale_params(parse_url(&format!("https://{input}"))?);
        } else if input.starts_with('/') {
            input.to_string()
        } else if input.starts_with('@') {
            format!("/{input}")
        } else if is_channel_id(input) {
            format!("/channel/{input}")
        } else {
            format!("/@{input}")
        };

        let url = base
            .join(&path)
            .map_err(|e| FetchError::InvalidUrl(format!("{input}: {e}")))?;
        self.with_locale_params(url)
    }

    /// Replace any existing locale parameters with the configured ones
    fn with_locale_params(&self, mut url: Url) -> std::result::Result<Url, FetchError> {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !LOCALE_PARAMS.contains(&key.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("hl", &self.config.host_language)
            .append_pair("persist_hl", "1")
            .append_pair("gl", &self.config.region);

        Ok(url)
    }

    /// Fetch a channel page and extract every field
    ///
    /// Fields whose patterns all fail keep their defaults. Only the request
    /// itself can fail:
    ///
    /// * 404 -> `CHANNEL_NOT_FOUND`
    /// * any other non-2xx, or a body that is not valid text -> `API_ERROR`
    /// * transport failure or timeout -> `NETWORK_ERROR`
    pub async fn scrape_channel_page(&self, input: &str) -> Result<ScrapedChannelData> {
        let url = self.channel_url(input)?;
        let headers = build_channel_headers(
            &self.config.user_agent,
            &self.config.accept_language,
            &self.config.consent_cookie,
        )?;

        let response = self.fetcher.get(url.as_str(), headers).await?;

        if response.status == 404 {
            tracing::warn!(url = %url, "Channel not found");
            return Err(FetchError::ChannelNotFound(input.trim().to_string()).into());
        }
        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "Channel page request failed");
            return Err(FetchError::api(response.status, None).into());
        }

        let html = response.text()?;

        let mut data = ScrapedChannelData::default();
        let mut matched = 0usize;
        for step in ChannelStep::ALL {
            self.pause().await;
            if self.extractor.apply(step, &html, &mut data) {
                matched += 1;
            }
        }

        tracing::info!(
            url = %url,
            name = %data.name,
            subscribers = data.subscriber_count,
            steps_matched = matched,
            "Scraped channel page"
        );

        Ok(data)
    }

    async fn pause(&self) {
        if self.config.yield_between_steps {
            tokio::task::yield_now().await;
        }
    }
}

fn parse_url(input: &str) -> std::result::Result<Url, FetchError> {
    Url::parse(input).map_err(|e| FetchError::InvalidUrl(format!("{input}: {e}")))
}

/// `UC` followed by 22 URL-safe base64 characters
fn is_channel_id(input: &str) -> bool {
    input.len() == 24
        && input.starts_with("UC")
        && input
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> ChannelScraper {
        ChannelScraper::new(ScraperConfig::default()).unwrap()
    }

    #[test]
    fn test_channel_url_from_handle() {
        let url = scraper().channel_url("@chimchakman").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/@chimchakman?hl=ko&persist_hl=1&gl=KR"
        );
    }

    #[test]
    fn test_channel_url_bare_name_is_handle() {
        let url = scraper().channel_url("chimchakman").unwrap();
        assert_eq!(url.path(), "/@chimchakman");
    }

    #[test]
    fn test_channel_url_from_channel_id() {
        let url = scraper().channel_url("UCUj6rrhMTR9pipbAWBAMvUQ").unwrap();
        assert_eq!(url.path(), "/channel/UCUj6rrhMTR9pipbAWBAMvUQ");
    }

    #[test]
    fn test_channel_url_merges_existing_query() {
        let url = scraper()
            .channel_url("https://www.youtube.com/@x/videos?view=0&hl=en")
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("view".to_string(), "0".to_string()),
                ("hl".to_string(), "ko".to_string()),
                ("persist_hl".to_string(), "1".to_string()),
                ("gl".to_string(), "KR".to_string()),
            ]
        );
    }

    #[test]
    fn test_channel_url_without_scheme() {
        let url = scraper().channel_url("www.youtube.com/@x").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/@x");
    }

    #[test]
    fn test_channel_url_relative_path() {
        let url = scraper().channel_url("/c/SomeName").unwrap();
        assert_eq!(url.path(), "/c/SomeName");
    }

    #[test]
    fn test_channel_url_empty() {
        assert!(matches!(
            scraper().channel_url("   "),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_is_channel_id() {
        assert!(is_channel_id("UCUj6rrhMTR9pipbAWBAMvUQ"));
        assert!(!is_channel_id("UCshort"));
        assert!(!is_channel_id("XXUj6rrhMTR9pipbAWBAMvUQ"));
    }

    #[test]
    fn test_with_base_url() {
        let scraper = ChannelScraper::with_base_url("http://127.0.0.1:9999/").unwrap();
        let url = scraper.channel_url("@x").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/@x?hl=ko&persist_hl=1&gl=KR");
    }
}

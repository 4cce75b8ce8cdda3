//! HTTP fetcher with charset-aware body decoding
//!
//! Thin layer over `reqwest`: one GET, no retries, no status judgement.
//! Callers decide what a given status means for their endpoint.

use crate::utils::error::FetchError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::HeaderMap, Client};
use std::time::Duration;

/// Raw response: status, declared content type and body bytes
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body strictly
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` if the bytes are invalid for the charset
    pub fn text(&self) -> Result<String, FetchError> {
        decode_bytes(&self.body, &self.content_type)
    }

    /// Decode the body, replacing invalid sequences
    pub fn text_lossy(&self) -> String {
        let (cow, _, _) = charset_of(&self.content_type).decode(&self.body);
        cow.into_owned()
    }
}

/// Plain GET fetcher shared by the channel scraper and the comments client
#[derive(Debug, Clone)]
pub struct PageFetcher {
    /// HTTP client with configured timeout
    client: Client,
}

impl PageFetcher {
    /// Create a new fetcher with a 30 second timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new fetcher with a custom request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        // Compressed comment responses are decoded transparently; channel
        // requests opt out with an explicit `Accept-Encoding: identity`.
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self { client })
    }

    /// Issue one GET request and read the whole body
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Timeout` or `FetchError::Http` on transport failure.
    /// Non-success statuses are not errors here.
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<FetchedResponse, FetchError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let body = response
            .bytes()
            .await
            .map_err(FetchError::from_transport)?
            .to_vec();

        tracing::debug!(url = %url, status, bytes = body.len(), "Response received");

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Encoding declared by a Content-Type header, UTF-8 when absent or unknown
fn charset_of(content_type: &str) -> &'static Encoding {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode bytes using the charset from `content_type` (UTF-8 by default)
///
/// A leading byte order mark overrides the declared charset.
///
/// # Errors
///
/// Returns `FetchError::Decode` if the bytes contain invalid sequences
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let encoding = charset_of(content_type);
    let (cow, used, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(FetchError::Decode(format!(
            "{} decoding errors",
            used.name()
        )));
    }

    Ok(cow.into_owned())
}

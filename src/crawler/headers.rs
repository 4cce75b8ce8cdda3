use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, COOKIE,
    USER_AGENT,
};

use crate::utils::error::FetchError;

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value)
        .map_err(|_| FetchError::InvalidUrl(format!("invalid {name} header value: {value}")))
}

/// Build browser-like headers for channel page requests
///
/// The page only embeds its full `ytInitialData` payload for desktop
/// browsers that already accepted the consent dialog, so the user agent and
/// consent cookie both matter. `Accept-Encoding: identity` keeps the body
/// uncompressed.
///
/// # Arguments
///
/// * `user_agent` - Desktop browser user agent string
/// * `accept_language` - Accept-Language header value
/// * `consent_cookie` - Full cookie string (e.g. `CONSENT=YES+...`)
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if a value is not a legal header value
///
/// # Examples
///
/// ```
/// use ytfacts::crawler::headers::build_channel_headers;
///
/// let headers = build_channel_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     "ko-KR,ko;q=0.9",
///     "CONSENT=YES+cb",
/// )
/// .unwrap();
/// assert_eq!(headers["accept-encoding"], "identity");
/// ```
pub fn build_channel_headers(
    user_agent: &str,
    accept_language: &str,
    consent_cookie: &str,
) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, header_value("user-agent", user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", accept_language)?,
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers.insert(COOKIE, header_value("cookie", consent_cookie)?);

    headers
        .insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("document"));
    headers
        .insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("navigate"));

    Ok(headers)
}

/// Build headers for the comments backend (JSON API)
pub fn build_comment_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
    );

    headers
}

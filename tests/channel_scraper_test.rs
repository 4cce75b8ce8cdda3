//! Integration tests for ChannelScraper using wiremock
//!
//! These tests validate the request shape and the error mapping of the
//! channel page scraper against a mock server.

mod common;

use common::{CHANNEL_PAGE, PLACEHOLDER_PAGE};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use ytfacts::config::ScraperConfig;
use ytfacts::crawler::ChannelScraper;
use ytfacts::error::ErrorCode;
use ytfacts::ScrapedChannelData;

/// Exact header match on the raw value (values here contain commas)
fn header_is(name: &'static str, expected: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |request: &Request| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            == Some(expected)
    }
}

/// Test a full scrape: request shape and every extracted field
#[tokio::test]
async fn test_scrape_channel_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@cookking"))
        .and(query_param("hl", "ko"))
        .and(query_param("persist_hl", "1"))
        .and(query_param("gl", "KR"))
        .and(header_is("accept-encoding", "identity"))
        .and(header_is("accept-language", "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"))
        .and(header_is("cookie", "CONSENT=YES+cb.20210328-17-p0.en+FX+100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(CHANNEL_PAGE),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let data = assert_ok!(scraper.scrape_channel_page("@cookking").await);

    assert_eq!(data.name, "요리왕");
    assert_eq!(data.subscriber_count, 6_200);
    assert_eq!(data.subscriber_text.as_deref(), Some("구독자 6.2천명"));
    assert_eq!(
        data.avatar_url,
        "https://yt3.googleusercontent.com/avatar=s176-c-k-c0x00ffffff-no-rj"
    );
    assert_eq!(
        data.banner_url.as_deref(),
        Some("https://yt3.googleusercontent.com/banner=w1060-fcrop64=1")
    );
    assert_eq!(data.description, "매주 금요일 업로드\n문의: cook@example.com");
    assert_eq!(data.video_count, Some(1_234));
}

/// Test that the user agent is a desktop browser
#[tokio::test]
async fn test_scrape_sends_desktop_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@cookking"))
        .and(header_is("user-agent", ytfacts::config::DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    assert_ok!(scraper.scrape_channel_page("@cookking").await);
}

/// Test channel id input resolves to /channel/<id>
#[tokio::test]
async fn test_scrape_by_channel_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel/UCabcdefghijklmnopqrstuv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let data = scraper
        .scrape_channel_page("UCabcdefghijklmnopqrstuv")
        .await
        .unwrap();
    assert_eq!(data.name, "요리왕");
}

/// Test 404 maps to CHANNEL_NOT_FOUND
#[tokio::test]
async fn test_scrape_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let err = assert_err!(scraper.scrape_channel_page("@missing").await);

    assert_eq!(err.code(), ErrorCode::ChannelNotFound);
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_recoverable());
}

/// Test other non-2xx statuses map to API_ERROR with a generic message
#[tokio::test]
async fn test_scrape_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@busy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>unavailable</html>"))
        .expect(1) // no retry inside the scraper
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let err = scraper.scrape_channel_page("@busy").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ApiError);
    assert_eq!(err.to_string(), "HTTP 503");
    assert!(err.is_recoverable());
}

/// Test an undecodable body maps to API_ERROR
#[tokio::test]
async fn test_scrape_invalid_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@garbled"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(vec![0x3c, 0x68, 0xff, 0xfe, 0xfd]),
        )
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let err = scraper.scrape_channel_page("@garbled").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ApiError);
}

/// Test that unmatched fields keep their defaults instead of failing
#[tokio::test]
async fn test_scrape_without_matches_returns_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLACEHOLDER_PAGE))
        .mount(&mock_server)
        .await;

    let scraper = ChannelScraper::with_base_url(&mock_server.uri()).unwrap();
    let data = scraper.scrape_channel_page("@empty").await.unwrap();

    assert_eq!(data, ScrapedChannelData::default());
    assert_eq!(data.name, "");
}

/// Test transport timeout maps to NETWORK_ERROR
#[tokio::test]
async fn test_scrape_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(CHANNEL_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = ScraperConfig {
        base_url: mock_server.uri(),
        request_timeout_secs: 1,
        ..ScraperConfig::default()
    };
    let scraper = ChannelScraper::new(config).unwrap();
    let err = scraper.scrape_channel_page("@slow").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NetworkError);
    assert!(err.is_recoverable());
}

/// Test extraction without cooperative yields gives the same result
#[tokio::test]
async fn test_scrape_without_yields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@cookking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
        .mount(&mock_server)
        .await;

    let config = ScraperConfig {
        base_url: mock_server.uri(),
        yield_between_steps: false,
        ..ScraperConfig::default()
    };
    let scraper = ChannelScraper::new(config).unwrap();
    let data = scraper.scrape_channel_page("@cookking").await.unwrap();

    assert_eq!(data.subscriber_count, 6_200);
    assert_eq!(data.video_count, Some(1_234));
}

//! Error types for fetching and decoding upstream payloads
//!
//! Request-level failures only. Field-level extraction failures never become
//! errors; they leave the field at its default.

use thiserror::Error;

/// Errors that can occur while talking to a remote host
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Channel page answered 404
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Non-success status with the server-provided message, or `HTTP <status>`
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Body could not be decoded to text
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Build an API error from a status code and an optional server message
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self::Api { status, message }
    }

    /// Map a reqwest error, keeping timeouts distinct
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors raised when a top-level response has an unexpected shape
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not the JSON document we expect
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBody(err.to_string())
    }
}

//! Unified error handling for the ytfacts crate
//!
//! Every request-level failure ends up as [`Error`], which carries a
//! machine-readable [`ErrorCode`] for callers deciding whether to offer a retry.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ytfacts::error::{Error, ErrorCode};
//!
//! fn handle_error(err: Error) {
//!     match err.code() {
//!         ErrorCode::ChannelNotFound => eprintln!("{}", err.localized_desc()),
//!         _ if err.is_recoverable() => eprintln!("retry: {err}"),
//!         _ => eprintln!("fatal: {err}"),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use crate::utils::error::{FetchError, ParseError};

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Channel page answered 404
    ChannelNotFound,
    /// Upstream answered with a non-success status or an undecodable body
    ApiError,
    /// Top-level response had an unexpected shape
    ParsingError,
    /// Transport failure before any response arrived
    NetworkError,
}

impl ErrorCode {
    /// Wire representation (`CHANNEL_NOT_FOUND`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChannelNotFound => "CHANNEL_NOT_FOUND",
            Self::ApiError => "API_ERROR",
            Self::ParsingError => "PARSING_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
        }
    }

    /// Localized description of the error class
    pub fn localized_desc(&self) -> String {
        match self {
            Self::ChannelNotFound => crate::i18n::t!("errors.channel_not_found").to_string(),
            Self::ApiError => crate::i18n::t!("errors.api_error").to_string(),
            Self::ParsingError => crate::i18n::t!("errors.parsing_error").to_string(),
            Self::NetworkError => crate::i18n::t!("errors.network_error").to_string(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the ytfacts crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response shape errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A single-flight result handed to every waiter of the same request
    #[error(transparent)]
    Shared(Arc<Error>),

    /// A background request task ended without publishing a result
    #[error("Request task ended without a result")]
    Aborted,
}

impl Error {
    /// Machine-readable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Fetch(e) => match e {
                FetchError::ChannelNotFound(_) => ErrorCode::ChannelNotFound,
                FetchError::Api { .. } | FetchError::Decode(_) => ErrorCode::ApiError,
                FetchError::Http(_) | FetchError::Timeout | FetchError::InvalidUrl(_) => {
                    ErrorCode::NetworkError
                }
            },
            Self::Parse(_) => ErrorCode::ParsingError,
            Self::Shared(inner) => inner.code(),
            Self::Aborted => ErrorCode::NetworkError,
        }
    }

    /// Hint for callers: would retrying the same request plausibly succeed?
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => match e {
                FetchError::Http(_) | FetchError::Timeout => true,
                FetchError::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
                FetchError::ChannelNotFound(_)
                | FetchError::Decode(_)
                | FetchError::InvalidUrl(_) => false,
            },
            Self::Parse(_) => false,
            Self::Shared(inner) => inner.is_recoverable(),
            Self::Aborted => true,
        }
    }

    /// Localized, user-facing description
    pub fn localized_desc(&self) -> String {
        format!("{}: {self}", self.code().localized_desc())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch(FetchError::Api { status, .. }) => Some(*status),
            Self::Fetch(FetchError::ChannelNotFound(_)) => Some(404),
            Self::Shared(inner) => inner.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(FetchError::from_transport(err))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

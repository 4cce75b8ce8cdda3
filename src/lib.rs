//! ytfacts - YouTube channel page and comment extraction engine
//!
//! Pulls structured facts out of pages and payloads that have no contract:
//! channel name, subscriber and video counts, images, descriptions and
//! paginated comments.
//!
//! # Architecture
//!
//! - [`parser`] - Pattern chains and count/duration/relative-time normalization
//! - [`crawler`] - Channel page scraper and the two-phase comments pipeline
//! - [`models`] - Scraped data and comment types
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type with machine-readable codes
//! - [`i18n`] - Korean and English display strings
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use ytfacts::config::Config;
//! use ytfacts::crawler::ChannelScraper;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let scraper = ChannelScraper::new(config.scraper)?;
//!     let channel = scraper.scrape_channel_page("@chimchakman").await?;
//!     println!("{} ({} subscribers)", channel.name, channel.subscriber_count);
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod crawler;
pub mod error;
pub mod i18n;
pub mod models;
pub mod parser;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{ChannelScraper, CommentClient, CommentPipeline, TokenState};
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::models::{Comment, CommentPage, CommentSort, CommentToken, ScrapedChannelData};
    pub use crate::parser::{
        format_relative_time, parse_count, parse_iso8601, parse_number, parse_seconds,
    };
}

// Direct re-exports for convenience
pub use models::{CommentPage, CommentSort, ScrapedChannelData};

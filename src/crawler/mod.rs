//! Network side: channel page scraping and the comments backend
//!
//! Both share [`fetcher::PageFetcher`] for transport and hand the bodies to
//! [`crate::parser`] for extraction.

pub mod channel;
pub mod comment;
pub mod fetcher;
pub mod headers;

pub use channel::ChannelScraper;
pub use comment::{CommentClient, CommentPipeline, TokenHandle, TokenState};
pub use fetcher::PageFetcher;

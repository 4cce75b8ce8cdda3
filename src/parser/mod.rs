//! Extraction and normalization of upstream text
//!
//! Everything here is synchronous and pure: pattern chains over raw page
//! text, count/duration/relative-time normalization and text cleanup. The
//! network side lives in [`crate::crawler`].

pub mod channel;
pub mod channel_patterns;
pub mod duration;
pub mod number;
pub mod pattern;
pub mod relative_time;
pub mod sanitize;

// Re-export main entry points
pub use channel::{ChannelExtractor, ChannelStep};
pub use duration::{parse_iso8601, parse_seconds};
pub use number::{parse_count, parse_number, ParsedNumber};
pub use pattern::{extract_field, extract_field_indexed, FieldPattern};
pub use relative_time::{format_relative_time, format_relative_time_at};

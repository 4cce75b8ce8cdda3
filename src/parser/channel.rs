//! Field extraction steps for channel pages
//!
//! Each step reads the raw page text and fills only the fields it owns on
//! [`ScrapedChannelData`]. A step that finds nothing is a no-op.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::ScrapedChannelData;
use crate::parser::channel_patterns::ChannelPatterns;
use crate::parser::number::parse_number;
use crate::parser::pattern::extract_field_indexed;

/// Avatar size requested in place of the thumbnail size the page embeds
pub const AVATAR_DISPLAY_SIZE: u32 = 176;

static AVATAR_SIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=s\d+(-|$)").unwrap());

/// Extraction steps, in the order the scraper runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStep {
    Name,
    Subscribers,
    Images,
    Description,
    VideoCount,
}

impl ChannelStep {
    pub const ALL: [ChannelStep; 5] = [
        Self::Name,
        Self::Subscribers,
        Self::Images,
        Self::Description,
        Self::VideoCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Subscribers => "subscribers",
            Self::Images => "images",
            Self::Description => "description",
            Self::VideoCount => "video_count",
        }
    }
}

/// Runs the pattern chains for a channel page
pub struct ChannelExtractor {
    patterns: ChannelPatterns,
}

impl ChannelExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: ChannelPatterns::new(),
        }
    }

    /// Run one step against `html`, filling `data`
    ///
    /// Returns whether the step found anything.
    pub fn apply(&self, step: ChannelStep, html: &str, data: &mut ScrapedChannelData) -> bool {
        let found = match step {
            ChannelStep::Name => self.extract_name(html, data),
            ChannelStep::Subscribers => self.extract_subscribers(html, data),
            ChannelStep::Images => self.extract_images(html, data),
            ChannelStep::Description => self.extract_description(html, data),
            ChannelStep::VideoCount => self.extract_video_count(html, data),
        };

        if !found {
            tracing::debug!(step = step.as_str(), "No pattern matched, keeping default");
        }
        found
    }

    /// Run every step in order without yielding
    pub fn extract_all(&self, html: &str) -> ScrapedChannelData {
        let mut data = ScrapedChannelData::default();
        for step in ChannelStep::ALL {
            self.apply(step, html, &mut data);
        }
        data
    }

    fn extract_name(&self, html: &str, data: &mut ScrapedChannelData) -> bool {
        let Some((idx, name)) = extract_field_indexed(html, self.patterns.name) else {
            return false;
        };
        tracing::trace!(field = "name", pattern = idx, "Matched");
        data.name = name;
        true
    }

    fn extract_subscribers(&self, html: &str, data: &mut ScrapedChannelData) -> bool {
        let Some((idx, text)) = extract_field_indexed(html, self.patterns.subscribers) else {
            return false;
        };
        tracing::trace!(field = "subscribers", pattern = idx, text = %text, "Matched");
        data.subscriber_count = parse_number(&text).value;
        data.subscriber_text = Some(text);
        true
    }

    fn extract_images(&self, html: &str, data: &mut ScrapedChannelData) -> bool {
        let avatar = extract_field_indexed(html, self.patterns.avatar);
        let banner = extract_field_indexed(html, self.patterns.banner);
        let found = avatar.is_some() || banner.is_some();

        if let Some((idx, url)) = avatar {
            tracing::trace!(field = "avatar", pattern = idx, "Matched");
            data.avatar_url = upgrade_avatar_size(&absolute_url(&url));
        }
        if let Some((idx, url)) = banner {
            tracing::trace!(field = "banner", pattern = idx, "Matched");
            data.banner_url = Some(absolute_url(&url));
        }
        found
    }

    fn extract_description(&self, html: &str, data: &mut ScrapedChannelData) -> bool {
        let Some((idx, description)) = extract_field_indexed(html, self.patterns.description)
        else {
            return false;
        };
        tracing::trace!(field = "description", pattern = idx, "Matched");
        data.description = description;
        true
    }

    fn extract_video_count(&self, html: &str, data: &mut ScrapedChannelData) -> bool {
        let Some((idx, text)) = extract_field_indexed(html, self.patterns.video_count) else {
            return false;
        };
        tracing::trace!(field = "video_count", pattern = idx, text = %text, "Matched");
        data.video_count = Some(parse_number(&text).value);
        true
    }
}

impl Default for ChannelExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Give protocol-relative image URLs a scheme
pub fn absolute_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        url.to_string()
    }
}

/// Replace the embedded thumbnail size (`=s48-...`) with the display size
pub fn upgrade_avatar_size(url: &str) -> String {
    AVATAR_SIZE_REGEX
        .replace(url, |caps: &regex::Captures<'_>| {
            format!("=s{AVATAR_DISPLAY_SIZE}{}", &caps[1])
        })
        .into_owned()
}

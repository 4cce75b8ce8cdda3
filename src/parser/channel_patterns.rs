//! Pattern chains for YouTube channel pages
//!
//! Each chain is ordered from the current markup (embedded `ytInitialData`
//! payload) to older or more generic fallbacks (meta tags, title tag, visible
//! text). Order matters: the first accepted capture wins.

use lazy_static::lazy_static;

use crate::parser::pattern::{validators, FieldPattern};

lazy_static! {
    static ref NAME: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""channelMetadataRenderer":\{"title":"((?:[^"\\]|\\.)*)""#)
            .validate(validators::not_placeholder_title),
        FieldPattern::new(r#""pageHeaderViewModel":\{"title":\{"dynamicTextViewModel":\{"text":\{"content":"((?:[^"\\]|\\.)*)""#)
            .validate(validators::not_placeholder_title),
        FieldPattern::new(r#"<meta property="og:title" content="([^"]*)""#)
            .validate(validators::not_placeholder_title),
        FieldPattern::new(r#"<meta name="title" content="([^"]*)""#)
            .validate(validators::not_placeholder_title),
        FieldPattern::new(r"<title>\s*([^<]*?)\s*(?:-\s*YouTube\s*)?</title>")
            .validate(validators::not_placeholder_title),
    ];

    static ref SUBSCRIBERS: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""subscriberCountText":\{"simpleText":"((?:[^"\\]|\\.)*)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r#""subscriberCountText":\{"accessibility":\{"accessibilityData":\{"label":"((?:[^"\\]|\\.)*)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r#""content":"(구독자\s*[\d.,]+\s*[천만억]?\s*명)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r#""content":"([\d.,]+\s*[KMBkmb]?\s+subscribers?)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r"(구독자\s*[\d.,]+\s*[천만억]?\s*명)")
            .validate(validators::has_digit),
        FieldPattern::new(r"([\d.,]+\s*[KMBkmb]?\s+subscribers?)")
            .validate(validators::has_digit),
    ];

    static ref AVATAR: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""avatar":\{"thumbnails":\[\{"url":"([^"]+)""#)
            .validate(validators::is_url),
        FieldPattern::new(r#""avatarViewModel":\{"image":\{"sources":\[\{"url":"([^"]+)""#)
            .validate(validators::is_url),
        FieldPattern::new(r#"<meta property="og:image" content="([^"]+)""#)
            .validate(validators::is_url),
        FieldPattern::new(r#"<link itemprop="thumbnailUrl" href="([^"]+)""#)
            .validate(validators::is_url),
    ];

    static ref BANNER: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""imageBannerViewModel":\{"image":\{"sources":\[\{"url":"([^"]+)""#)
            .validate(validators::is_url),
        FieldPattern::new(r#""banner":\{"thumbnails":\[\{"url":"([^"]+)""#)
            .validate(validators::is_url),
        FieldPattern::new(r#""tvBanner":\{"thumbnails":\[\{"url":"([^"]+)""#)
            .validate(validators::is_url),
    ];

    static ref DESCRIPTION: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""channelMetadataRenderer":\{[^{}]*?"description":"((?:[^"\\]|\\.)*)""#),
        FieldPattern::new(r#""descriptionPreviewViewModel":\{"description":\{"content":"((?:[^"\\]|\\.)*)""#),
        FieldPattern::new(r#"<meta property="og:description" content="([^"]*)""#),
        FieldPattern::new(r#"<meta name="description" content="([^"]*)""#),
    ];

    static ref VIDEO_COUNT: Vec<FieldPattern> = vec![
        FieldPattern::new(r#""videosCountText":\{"runs":\[\{"text":"([^"]+)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r#""content":"(동영상\s*[\d.,]+\s*[천만억]?\s*개)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r#""content":"([\d.,]+\s*[KMBkmb]?\s+videos?)""#)
            .validate(validators::has_digit),
        FieldPattern::new(r"(동영상\s*[\d.,]+\s*[천만억]?\s*개)")
            .validate(validators::has_digit),
        FieldPattern::new(r"([\d.,]+\s*[KMBkmb]?\s+videos?)")
            .validate(validators::has_digit),
    ];
}

/// Pattern chains for every field scraped from a channel page
pub struct ChannelPatterns {
    pub name: &'static [FieldPattern],
    pub subscribers: &'static [FieldPattern],
    pub avatar: &'static [FieldPattern],
    pub banner: &'static [FieldPattern],
    pub description: &'static [FieldPattern],
    pub video_count: &'static [FieldPattern],
}

impl ChannelPatterns {
    pub fn new() -> Self {
        Self {
            name: &NAME,
            subscribers: &SUBSCRIBERS,
            avatar: &AVATAR,
            banner: &BANNER,
            description: &DESCRIPTION,
            video_count: &VIDEO_COUNT,
        }
    }
}

impl Default for ChannelPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::pattern::{extract_field, extract_field_indexed};

    #[test]
    fn test_all_patterns_compile() {
        let patterns = ChannelPatterns::new();
        let total = patterns.name.len()
            + patterns.subscribers.len()
            + patterns.avatar.len()
            + patterns.banner.len()
            + patterns.description.len()
            + patterns.video_count.len();
        assert!(total > 20);
    }

    #[test]
    fn test_name_prefers_payload_over_meta() {
        let patterns = ChannelPatterns::new();
        let html = r#"<meta property="og:title" content="Meta Name">
<script>var ytInitialData = {"metadata":{"channelMetadataRenderer":{"title":"Payload Name","description":"d"}}};</script>"#;
        assert_eq!(
            extract_field_indexed(html, patterns.name),
            Some((0, "Payload Name".to_string()))
        );
    }

    #[test]
    fn test_name_title_tag_strips_suffix() {
        let patterns = ChannelPatterns::new();
        let html = "<title>침착맨 - YouTube</title>";
        assert_eq!(extract_field(html, patterns.name).as_deref(), Some("침착맨"));
    }

    #[test]
    fn test_name_placeholder_rejected() {
        let patterns = ChannelPatterns::new();
        let html = r#"<meta property="og:title" content="YouTube"><title>YouTube</title>"#;
        assert_eq!(extract_field(html, patterns.name), None);
    }

    #[test]
    fn test_subscribers_korean_text() {
        let patterns = ChannelPatterns::new();
        let html = r#"{"subscriberCountText":{"simpleText":"구독자 6.2천명"}}"#;
        assert_eq!(
            extract_field(html, patterns.subscribers).as_deref(),
            Some("구독자 6.2천명")
        );
    }

    #[test]
    fn test_subscribers_metadata_parts() {
        let patterns = ChannelPatterns::new();
        let html = r#"{"metadataParts":[{"text":{"content":"@handle"}},{"text":{"content":"구독자 151만명"}}]}"#;
        assert_eq!(
            extract_field(html, patterns.subscribers).as_deref(),
            Some("구독자 151만명")
        );
    }

    #[test]
    fn test_subscribers_english_fallback() {
        let patterns = ChannelPatterns::new();
        let html = "<span>1.5M subscribers</span>";
        assert_eq!(
            extract_field(html, patterns.subscribers).as_deref(),
            Some("1.5M subscribers")
        );
    }

    #[test]
    fn test_description_payload_with_escapes() {
        let patterns = ChannelPatterns::new();
        let html = r#"{"channelMetadataRenderer":{"title":"T","description":"첫 줄\n\"인용\" & 끝","ownerUrls":[]}}"#;
        assert_eq!(
            extract_field(html, patterns.description).as_deref(),
            Some("첫 줄\n\"인용\" & 끝")
        );
    }

    #[test]
    fn test_description_meta_fallback() {
        let patterns = ChannelPatterns::new();
        let html = r#"<meta name="description" content="Cooking &amp; travel">"#;
        assert_eq!(
            extract_field(html, patterns.description).as_deref(),
            Some("Cooking & travel")
        );
    }

    #[test]
    fn test_avatar_and_banner() {
        let patterns = ChannelPatterns::new();
        let html = r#"{"avatar":{"thumbnails":[{"url":"https://yt3.ggpht.com/abc=s48-c-k","width":48}]},
"banner":{"thumbnails":[{"url":"https://yt3.googleusercontent.com/banner=w1060"}]}}"#;
        assert_eq!(
            extract_field(html, patterns.avatar).as_deref(),
            Some("https://yt3.ggpht.com/abc=s48-c-k")
        );
        assert_eq!(
            extract_field(html, patterns.banner).as_deref(),
            Some("https://yt3.googleusercontent.com/banner=w1060")
        );
    }

    #[test]
    fn test_video_count() {
        let patterns = ChannelPatterns::new();
        let html = r#"{"videosCountText":{"runs":[{"text":"1,234"},{"text":"개의 동영상"}]}}"#;
        assert_eq!(extract_field(html, patterns.video_count).as_deref(), Some("1,234"));

        let html = r#"{"content":"동영상 3.4천개"}"#;
        assert_eq!(
            extract_field(html, patterns.video_count).as_deref(),
            Some("동영상 3.4천개")
        );
    }
}

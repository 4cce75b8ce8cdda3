// Core data structures for ytfacts

use serde::{Deserialize, Deserializer, Serialize};

use crate::parser::number::parse_count;

/// Facts scraped from one channel page
///
/// Every field starts at its default and is filled by the extraction step
/// that owns it; a step that finds nothing leaves the default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedChannelData {
    pub name: String,
    pub description: String,
    pub subscriber_count: u64,
    pub subscriber_text: Option<String>,
    pub avatar_url: String,
    pub banner_url: Option<String>,
    pub video_count: Option<u64>,
}

/// Comment ordering requested from the comments backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    /// Backend default (top comments)
    #[default]
    Top,
    Newest,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Newest => "newest",
        }
    }

    /// Create from string (English or Korean label)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" | "popular" | "인기순" => Some(Self::Top),
            "newest" | "new" | "최신순" => Some(Self::Newest),
            _ => None,
        }
    }
}

/// Comment author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub profile_image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

/// One comment as returned by the comments backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author: CommentAuthor,

    #[serde(default, deserialize_with = "lenient_count")]
    pub like_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count_text: Option<String>,

    #[serde(default)]
    pub published_time_text: String,

    #[serde(default, deserialize_with = "lenient_count")]
    pub reply_count: u64,

    #[serde(default)]
    pub is_hearted: bool,

    #[serde(default)]
    pub is_pinned: bool,
}

impl Comment {
    /// Check if this comment has replies
    pub fn has_replies(&self) -> bool {
        self.reply_count > 0
    }
}

/// Phase-one result: a continuation token for the comment listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentToken {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count_text: Option<String>,
}

impl CommentToken {
    /// Usable token, ignoring blanks
    pub fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// One page of comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<Comment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count_text: Option<String>,

    #[serde(default)]
    pub has_more: bool,

    /// Token for the following page, when the backend hands one out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

impl CommentPage {
    /// Total comment count parsed from `total_count_text`, 0 when absent
    pub fn total_count(&self) -> u64 {
        self.total_count_text.as_deref().map(parse_count).unwrap_or(0)
    }
}

/// Accept counts as JSON numbers or display text; never negative
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_count(&s),
        _ => 0,
    })
}

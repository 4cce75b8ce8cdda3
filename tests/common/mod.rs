//! Common test utilities

use serde_json::{json, Value};

/// Path the comments backend is mounted at on the mock server
pub const COMMENTS_PATH: &str = "/functions/v1/youtube-comments";

/// Channel page with the embedded payload most pages carry today
pub const CHANNEL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ko-KR"><head>
<title>요리왕 - YouTube</title>
<meta property="og:title" content="요리왕">
<meta property="og:image" content="https://yt3.googleusercontent.com/og=s900-c-k-c0x00ffffff-no-rj">
<meta name="description" content="메타 설명">
</head><body>
<script nonce="x">var ytInitialData = {"header":{"c4TabbedHeaderRenderer":{"channelId":"UCabcdefghijklmnopqrstuv","title":"요리왕","avatar":{"thumbnails":[{"url":"//yt3.googleusercontent.com/avatar=s48-c-k-c0x00ffffff-no-rj","width":48,"height":48}]},"banner":{"thumbnails":[{"url":"https://yt3.googleusercontent.com/banner=w1060-fcrop64=1","width":1060}]},"subscriberCountText":{"simpleText":"구독자 6.2천명"},"videosCountText":{"runs":[{"text":"1,234"},{"text":"개의 동영상"}]}}},"metadata":{"channelMetadataRenderer":{"title":"요리왕","description":"매주 금요일 업로드\n문의: cook@example.com","externalId":"UCabcdefghijklmnopqrstuv"}}};</script>
</body></html>"#;

/// Page that only has the generic site title
pub const PLACEHOLDER_PAGE: &str =
    "<html><head><title>YouTube</title></head><body><p>consent</p></body></html>";

/// Comment page body as the backend returns it
#[allow(dead_code)]
pub fn comment_page(ids: &[&str], total: Option<&str>) -> Value {
    let comments: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "content": format!("댓글 {id}"),
                "author": {
                    "name": format!("@user_{id}"),
                    "profileImageUrl": "https://yt3.ggpht.com/p=s88",
                    "channelId": format!("UC{id}")
                },
                "likeCount": 12,
                "likeCountText": "12",
                "publishedTimeText": "3일 전",
                "replyCount": 0,
                "isHearted": false,
                "isPinned": false
            })
        })
        .collect();

    let mut body = json!({ "comments": comments, "hasMore": false });
    if let Some(total) = total {
        body["totalCountText"] = json!(total);
    }
    body
}

/// Comments endpoint on the given mock server
#[allow(dead_code)]
pub fn endpoint(server_uri: &str) -> String {
    format!("{server_uri}{COMMENTS_PATH}")
}

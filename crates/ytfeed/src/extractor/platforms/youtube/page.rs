use crate::video::LiveStatus;
use regex::Regex;
use std::sync::LazyLock;

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").unwrap());

static AUTHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""author":"([^"]+)""#).unwrap());

static DESCRIPTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""shortDescription":"([^"]+)""#).unwrap());

static THUMBNAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""thumbnailUrl":"(https://i\.ytimg\.com[^"]+)""#).unwrap());

static CHANNEL_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""channelId":"(UC[^"]+)""#).unwrap());

static OG_URL_CHANNEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:url" content="https://www\.youtube\.com/channel/(UC[^"]+)">"#)
        .unwrap()
});

static OG_IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:image" content="([^"]+)""#).unwrap());

const TITLE_SUFFIX: &str = " - YouTube";

/// Metadata scraped from a watch page. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoPage {
    pub title: String,
    pub author: String,
    pub description: String,
    pub thumbnails: Vec<String>,
}

impl VideoPage {
    pub fn parse(html: &str) -> Self {
        let first = |regex: &Regex| {
            regex
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        };

        let title = first(&TITLE_REGEX)
            .map(|t| t.replace(TITLE_SUFFIX, ""))
            .unwrap_or_default();
        let author = first(&AUTHOR_REGEX).unwrap_or_default().to_string();
        let description = first(&DESCRIPTION_REGEX)
            .map(|d| d.replace("\\n", "\n"))
            .unwrap_or_default();
        let thumbnails = THUMBNAIL_REGEX
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().replace("\\/", "/"))
            .collect();

        Self {
            title,
            author,
            description,
            thumbnails,
        }
    }
}

/// Channel id declared by a channel page, via its JSON or its `og:url`.
pub fn channel_id_from_html(html: &str) -> Option<String> {
    CHANNEL_ID_REGEX
        .captures(html)
        .or_else(|| OG_URL_CHANNEL_REGEX.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn owner_image_from_html(html: &str) -> Option<String> {
    OG_IMAGE_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Coarse live status from well-known page markers.
///
/// Cheaper and less precise than the broadcast-details pass done by the
/// classifier; used when only the status is wanted.
pub fn live_status_from_markers(html: &str) -> LiveStatus {
    if html.contains(r#""isLive":true"#) || html.contains(r#""liveBroadcastContent":"live""#) {
        return LiveStatus::Live;
    }
    if html.contains(r#""liveBroadcastContent":"upcoming""#) || html.contains(r#""isUpcoming":true"#)
    {
        return LiveStatus::Upcoming;
    }
    if html.contains(r#""ended":true"#) {
        return LiveStatus::Ended;
    }
    LiveStatus::None
}

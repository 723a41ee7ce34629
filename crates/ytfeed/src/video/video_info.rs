use super::types::{LiveStatus, VideoType};
use serde::{Deserialize, Serialize};

const DEFAULT_THUMBNAIL_TEMPLATE: &str = "https://i.ytimg.com/vi/{video_id}/hqdefault.jpg";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
/// One entry of a channel's video feed.
///
/// # Fields
///
/// * `video_id` - Opaque identifier assigned by the feed
/// * `title` - Title as published in the feed
/// * `author` - Channel display name
/// * `published` - ISO-8601 timestamp, empty when the feed omits it
/// * `url` - Link to the video, either a watch or a shorts URL
/// * `description` - The feed's `media:description`, may be empty
/// * `thumbnail` - The feed's `media:thumbnail`, if any
/// * `video_type` - Set by URL-only classification when built from a feed
/// * `live_status` - Only filled in by callers that probed the watch page
///
/// # Examples
///
/// ```rust
/// use ytfeed_parser::video::{VideoSummary, VideoType};
///
/// let video = VideoSummary {
///     video_id: "abc123".to_string(),
///     title: "Sample".to_string(),
///     author: "Sample Channel".to_string(),
///     published: "2024-01-01T00:00:00+00:00".to_string(),
///     url: "https://www.youtube.com/shorts/abc123".to_string(),
///     description: String::new(),
///     thumbnail: None,
///     video_type: Some(VideoType::Shorts),
///     live_status: None,
/// };
/// assert!(video.video_type.is_some());
/// ```
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub published: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<VideoType>,
    pub live_status: Option<LiveStatus>,
}

/// A video after its watch page was fetched (or attempted) and classified.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoDetail {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub published: String,
    pub url: String,
    pub description: String,
    pub thumbnails: Vec<String>,
    /// Never empty, see [`VideoDetail::default_image_url`].
    pub image_url: String,
    #[serde(rename = "type")]
    pub video_type: VideoType,
    pub live_status: LiveStatus,
}

impl VideoDetail {
    /// Thumbnail URL used when the page did not expose any.
    ///
    /// This only follows the usual `i.ytimg.com` layout, nothing guarantees
    /// the image exists for every id.
    pub fn default_image_url(video_id: &str) -> String {
        DEFAULT_THUMBNAIL_TEMPLATE.replace("{video_id}", video_id)
    }

    /// Picks the first thumbnail, falling back to the default template.
    pub fn image_url_for(video_id: &str, thumbnails: &[String]) -> String {
        thumbnails
            .first()
            .filter(|url| !url.is_empty())
            .cloned()
            .unwrap_or_else(|| Self::default_image_url(video_id))
    }
}

/// One page of a channel's feed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VideoPageResult {
    pub videos: Vec<VideoSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

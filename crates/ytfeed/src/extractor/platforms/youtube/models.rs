#![allow(unused)]

use serde::Deserialize;

/// Root `<feed>` element of `feeds/videos.xml`.
///
/// quick-xml matches local names, so `yt:` and `media:` prefixes are left out.
#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    pub author: Option<Author>,
    #[serde(rename = "entry", default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    #[serde(rename = "@rel", default)]
    pub rel: String,
    #[serde(rename = "@href", default)]
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(rename = "videoId", default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    pub link: Option<Link>,
    pub author: Option<Author>,
    #[serde(default)]
    pub published: String,
    #[serde(rename = "group")]
    pub media_group: Option<MediaGroup>,
}

#[derive(Debug, Deserialize)]
pub struct MediaGroup {
    #[serde(rename = "thumbnail")]
    pub thumbnail: Option<MediaThumbnail>,
    #[serde(rename = "description", default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaThumbnail {
    #[serde(rename = "@url", default)]
    pub url: String,
}

use super::models::{Entry, Feed};
use super::watch_url;
use crate::extractor::{classifier::classify_by_url_only, error::ExtractorError};
use crate::video::VideoSummary;
use tracing::warn;

pub fn parse_feed(xml: &str) -> Result<Feed, ExtractorError> {
    Ok(quick_xml::de::from_str::<Feed>(xml)?)
}

/// Turns feed entries into summaries, keeping feed order.
///
/// Entries without a video id are skipped.
pub fn summaries(feed: Feed) -> Vec<VideoSummary> {
    let channel_author = feed.author.map(|a| a.name).unwrap_or_default();

    feed.entries
        .into_iter()
        .filter_map(|entry| {
            if entry.video_id.trim().is_empty() {
                warn!("Skipping feed entry without video id: {:?}", entry.title);
                return None;
            }
            Some(summary_from_entry(entry, &channel_author))
        })
        .collect()
}

fn summary_from_entry(entry: Entry, channel_author: &str) -> VideoSummary {
    let url = entry
        .link
        .map(|link| link.href)
        .filter(|href| !href.is_empty())
        .unwrap_or_else(|| watch_url(&entry.video_id));
    let author = entry
        .author
        .map(|a| a.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| channel_author.to_string());
    let (description, thumbnail) = entry
        .media_group
        .map(|group| {
            let thumbnail = group
                .thumbnail
                .map(|t| t.url)
                .filter(|url| !url.is_empty());
            (group.description, thumbnail)
        })
        .unwrap_or_default();

    VideoSummary {
        video_type: Some(classify_by_url_only(&url)),
        video_id: entry.video_id,
        title: entry.title,
        author,
        published: entry.published,
        url,
        description,
        thumbnail,
        live_status: None,
    }
}

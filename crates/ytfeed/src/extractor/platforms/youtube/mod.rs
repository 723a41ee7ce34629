mod builder;
pub mod feed;
pub mod models;
pub mod page;

pub use builder::{DEFAULT_DETAIL_CONCURRENCY, URL_REGEX, YoutubeRss};

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn feed_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}")
}

pub fn channel_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{channel_id}")
}

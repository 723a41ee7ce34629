use super::{
    channel_url, feed, feed_url,
    page::{self, VideoPage},
    watch_url,
};
use crate::{
    extractor::{
        classifier::classify_signals,
        error::ExtractorError,
        platform_extractor::{Extractor, PageFetcher},
        signals::Signals,
    },
    video::{LiveStatus, VideoDetail, VideoPageResult, VideoSummary},
};
use futures::{StreamExt, stream};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/").unwrap()
});

// channel, custom url, legacy user and handle forms, in lookup order
static CHANNEL_URL_REGEXES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/c/([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/user/([a-zA-Z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/@([a-zA-Z0-9_-]+)").unwrap(),
    ]
});

pub const DEFAULT_DETAIL_CONCURRENCY: usize = 3;

const BASE_URL: &str = "https://www.youtube.com";

/// Channel feed and watch-page scraper.
///
/// Generic over the page source so the orchestration can run against
/// canned pages; [`YoutubeRss::new`] wires it to HTTP.
pub struct YoutubeRss<F = Extractor> {
    fetcher: F,
}

impl YoutubeRss<Extractor> {
    pub fn new(client: Client, cookies: Option<String>) -> Self {
        let mut extractor = Extractor::new("YouTube", client);
        extractor.add_header(reqwest::header::REFERER.as_str(), BASE_URL);
        if let Some(cookies) = cookies {
            extractor.set_cookies_from_string(&cookies);
        }
        Self { fetcher: extractor }
    }
}

impl<F: PageFetcher> YoutubeRss<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolves a channel URL to its `UC…` id.
    ///
    /// Ids already present in the URL are returned as is; handles, custom
    /// and legacy user URLs are resolved through the channel page.
    pub async fn extract_channel_id(&self, url: &str) -> Result<String, ExtractorError> {
        let url = normalize_url(url)?;
        let url = url.as_str();
        let candidate = CHANNEL_URL_REGEXES
            .iter()
            .find_map(|regex| regex.captures(url).and_then(|caps| caps.get(1)))
            .map(|m| m.as_str())
            .ok_or_else(|| ExtractorError::InvalidUrl(format!("not a channel url: {url}")))?;

        if candidate.starts_with("UC") {
            return Ok(candidate.to_string());
        }

        debug!("Resolving channel id for {} from page", candidate);
        let html = self.fetcher.fetch_text(url).await?;
        page::channel_id_from_html(&html).ok_or(ExtractorError::ChannelNotFound)
    }

    async fn fetch_feed(&self, channel_id: &str) -> Result<super::models::Feed, ExtractorError> {
        let xml = self.fetcher.fetch_text(&feed_url(channel_id)).await?;
        feed::parse_feed(&xml)
    }

    pub async fn channel_name(&self, channel_id: &str) -> Result<String, ExtractorError> {
        let feed = self.fetch_feed(channel_id).await?;
        if feed.title.trim().is_empty() {
            return Err(ExtractorError::ChannelNotFound);
        }
        Ok(feed.title)
    }

    /// Latest uploads in feed order, typed from their URL only.
    pub async fn latest_videos(&self, channel_id: &str) -> Result<Vec<VideoSummary>, ExtractorError> {
        let feed = self.fetch_feed(channel_id).await?;
        let videos = feed::summaries(feed);
        debug!("Feed for {} has {} videos", channel_id, videos.len());
        Ok(videos)
    }

    /// Live status from page markers. A page that cannot be fetched is `None`.
    pub async fn live_status(&self, video_id: &str) -> LiveStatus {
        match self.fetcher.fetch_text(&watch_url(video_id)).await {
            Ok(html) => page::live_status_from_markers(&html),
            Err(e) => {
                warn!("Failed to fetch watch page of {}: {}", video_id, e);
                LiveStatus::None
            }
        }
    }

    pub async fn latest_video_info(
        &self,
        channel_id: &str,
    ) -> Result<Option<VideoSummary>, ExtractorError> {
        let Some(mut latest) = self.latest_videos(channel_id).await?.into_iter().next() else {
            return Ok(None);
        };
        latest.live_status = Some(self.live_status(&latest.video_id).await);
        Ok(Some(latest))
    }

    /// One-based paging over the feed.
    pub async fn videos_with_paging(
        &self,
        channel_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<VideoPageResult, ExtractorError> {
        if page == 0 || page_size == 0 {
            return Err(ExtractorError::ValidationError(
                "page and page size start at 1".to_string(),
            ));
        }

        let videos = self.latest_videos(channel_id).await?;
        let total = videos.len();
        let start = (page - 1).saturating_mul(page_size);
        let videos = videos.into_iter().skip(start).take(page_size).collect();

        Ok(VideoPageResult {
            videos,
            page,
            page_size,
            total,
        })
    }

    /// Fetches and classifies a single watch page.
    pub async fn video_detail(&self, video_id: &str) -> Result<VideoDetail, ExtractorError> {
        if video_id.trim().is_empty() {
            return Err(ExtractorError::VideoNotFound(video_id.to_string()));
        }
        let url = watch_url(video_id);
        let html = self.fetcher.fetch_text(&url).await?;
        Ok(assemble_detail(video_id, &url, None, Some(&html)))
    }

    /// Detail for a feed entry. When the page is unavailable the entry is
    /// classified from its feed fields alone.
    pub async fn detail_for(&self, summary: &VideoSummary) -> VideoDetail {
        let html = match self.fetcher.fetch_text(&watch_url(&summary.video_id)).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(
                    "Watch page of {} unavailable, classifying from feed: {}",
                    summary.video_id, e
                );
                None
            }
        };
        assemble_detail(&summary.video_id, &summary.url, Some(summary), html.as_deref())
    }

    /// Latest uploads with per-video details, fetched `concurrency` at a time.
    /// Output keeps feed order.
    pub async fn latest_videos_with_details(
        &self,
        channel_id: &str,
        concurrency: usize,
    ) -> Result<Vec<VideoDetail>, ExtractorError> {
        let videos = self.latest_videos(channel_id).await?;
        Ok(self.details_for(&videos, concurrency).await)
    }

    /// Details for already listed videos, fetched `concurrency` at a time.
    ///
    /// Never fails: each page fetch is bounded by the client timeout and a
    /// failed one degrades to the feed fields.
    pub async fn details_for(
        &self,
        videos: &[VideoSummary],
        concurrency: usize,
    ) -> Vec<VideoDetail> {
        let details = stream::iter(videos.iter())
            .map(|summary| self.detail_for(summary))
            .buffered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        for d in &details {
            debug!(
                "[DETAIL] {} {} {} {}",
                d.video_id, d.title, d.video_type, d.live_status
            );
        }
        details
    }

    pub async fn channel_owner_image(
        &self,
        channel_id: &str,
    ) -> Result<Option<String>, ExtractorError> {
        let html = self.fetcher.fetch_text(&channel_url(channel_id)).await?;
        Ok(page::owner_image_from_html(&html))
    }
}

/// Parses `input`, adding the https scheme when it is missing.
fn normalize_url(input: &str) -> Result<Url, ExtractorError> {
    let input = input.trim();
    let parsed = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{input}"))
            .map_err(|e| ExtractorError::InvalidUrl(format!("{input}: {e}")))?,
        Err(e) => return Err(ExtractorError::InvalidUrl(format!("{input}: {e}"))),
    };
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractorError::InvalidUrl(format!(
            "unsupported scheme {other}: {input}"
        ))),
    }
}

/// Builds a classified detail from whatever is known about a video.
///
/// Page metadata wins over feed metadata; feed values fill the gaps.
pub(crate) fn assemble_detail(
    video_id: &str,
    url: &str,
    summary: Option<&VideoSummary>,
    html: Option<&str>,
) -> VideoDetail {
    let page = html.map(VideoPage::parse).unwrap_or_default();
    let pick = |from_page: String, from_feed: Option<&String>| {
        if from_page.is_empty() {
            from_feed.cloned().unwrap_or_default()
        } else {
            from_page
        }
    };

    let title = pick(page.title, summary.map(|s| &s.title));
    let author = pick(page.author, summary.map(|s| &s.author));
    let description = pick(page.description, summary.map(|s| &s.description));
    let published = summary.map(|s| s.published.clone()).unwrap_or_default();

    let signals = Signals::collect(url, Some(title.as_str()), Some(description.as_str()), html);
    debug!("{} signals: {:?}", video_id, signals);
    let (video_type, live_status) = classify_signals(&signals);
    debug!("{} classified as {} / {}", video_id, video_type, live_status);

    let mut thumbnails = page.thumbnails;
    if thumbnails.is_empty() {
        thumbnails.extend(summary.and_then(|s| s.thumbnail.clone()));
    }
    let image_url = VideoDetail::image_url_for(video_id, &thumbnails);

    VideoDetail {
        video_id: video_id.to_string(),
        title,
        author,
        published,
        url: url.to_string(),
        description,
        thumbnails,
        image_url,
        video_type,
        live_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::platforms::youtube::feed::tests::SAMPLE_FEED;
    use crate::video::VideoType;
    use async_trait::async_trait;
    use rustc_hash::FxHashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHANNEL: &str = "UCxxxxxxxxxxxxxxxxxxxxxx";

    #[derive(Default)]
    struct CannedPages {
        pages: FxHashMap<String, String>,
        requests: AtomicUsize,
    }

    impl CannedPages {
        fn with(mut self, url: String, body: &str) -> Self {
            self.pages.insert(url, body.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for CannedPages {
        async fn fetch_text(&self, url: &str) -> Result<String, ExtractorError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ExtractorError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn channel_fixture() -> YoutubeRss<CannedPages> {
        let pages = CannedPages::default()
            .with(feed_url(CHANNEL), SAMPLE_FEED)
            .with(
                watch_url("vid00000001"),
                r#"<title>Friday stream - YouTube</title>"isLiveContent":true,"liveBroadcastDetails":{"isLiveNow":false,"startTimestamp":"2024-05-03T10:00:00+00:00","endTimestamp":"2024-05-03T12:00:00+00:00"}"#,
            )
            .with(
                watch_url("vid00000002"),
                r#"<title>A quick one - YouTube</title>"isLiveContent":false"#,
            );
        // vid00000003 has no page
        YoutubeRss::with_fetcher(pages)
    }

    #[tokio::test]
    async fn test_extract_channel_id_direct() {
        let rss = YoutubeRss::with_fetcher(CannedPages::default());
        let id = rss
            .extract_channel_id("https://www.youtube.com/channel/UCabcdefghijklmnopqrstuv")
            .await
            .unwrap();
        assert_eq!(id, "UCabcdefghijklmnopqrstuv");
        assert_eq!(rss.fetcher().requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_channel_id_normalizes_url() {
        let rss = YoutubeRss::with_fetcher(CannedPages::default());
        assert_eq!(
            rss.extract_channel_id("youtube.com/channel/UCabcdefghijklmnopqrstuv")
                .await
                .unwrap(),
            "UCabcdefghijklmnopqrstuv"
        );
        assert!(matches!(
            rss.extract_channel_id("ftp://www.youtube.com/channel/UCabcdefghijklmnopqrstuv")
                .await,
            Err(ExtractorError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_channel_id_from_handle() {
        let url = "https://www.youtube.com/@SampleChannel";
        let rss = YoutubeRss::with_fetcher(
            CannedPages::default().with(url.to_string(), r#"{"channelId":"UCabcdefghijklmnopqrstuv"}"#),
        );
        assert_eq!(
            rss.extract_channel_id(url).await.unwrap(),
            "UCabcdefghijklmnopqrstuv"
        );

        assert!(matches!(
            rss.extract_channel_id("https://example.com/nothing").await,
            Err(ExtractorError::InvalidUrl(_))
        ));
        assert!(matches!(
            rss.extract_channel_id("https://www.youtube.com/@missing").await,
            Err(ExtractorError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_channel_name() {
        let rss = channel_fixture();
        assert_eq!(rss.channel_name(CHANNEL).await.unwrap(), "Sample Channel");
    }

    #[tokio::test]
    async fn test_paging() {
        let rss = channel_fixture();
        let page = rss.videos_with_paging(CHANNEL, 2, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.videos.len(), 1);
        assert_eq!(page.videos[0].video_id, "vid00000003");

        let page = rss.videos_with_paging(CHANNEL, 5, 2).await.unwrap();
        assert!(page.videos.is_empty());
        assert!(rss.videos_with_paging(CHANNEL, 0, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_details_degrade_and_keep_order() {
        let rss = channel_fixture();
        let details = rss.latest_videos_with_details(CHANNEL, 2).await.unwrap();

        let got: Vec<_> = details
            .iter()
            .map(|d| (d.video_id.as_str(), d.video_type, d.live_status))
            .collect();
        assert_eq!(
            got,
            [
                ("vid00000001", VideoType::LiveContents, LiveStatus::Ended),
                // shorts link in the feed wins over isLiveContent:false
                ("vid00000002", VideoType::Shorts, LiveStatus::None),
                ("vid00000003", VideoType::Normal, LiveStatus::None),
            ]
        );

        assert_eq!(details[0].title, "Friday stream");
        assert_eq!(details[0].published, "2024-05-03T10:00:00+00:00");
        assert_eq!(details[2].title, "Cooking pasta");
        assert_eq!(details[2].description, "Dinner in ten minutes");
        // no page, so the feed thumbnail is used before the template
        assert_eq!(
            details[2].image_url,
            "https://i3.ytimg.com/vi/vid00000003/hqdefault.jpg"
        );
        assert_eq!(
            details[2].thumbnails,
            ["https://i3.ytimg.com/vi/vid00000003/hqdefault.jpg"]
        );
    }

    #[tokio::test]
    async fn test_details_for_known_summaries_skip_the_feed() {
        let rss = channel_fixture();
        let videos = feed::summaries(feed::parse_feed(SAMPLE_FEED).unwrap());

        let details = rss.details_for(&videos, 3).await;
        assert_eq!(details.len(), 3);
        assert_eq!(details[1].video_type, VideoType::Shorts);
        // one watch page per video, no feed request
        assert_eq!(rss.fetcher().requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_page_falls_back_to_feed_keywords() {
        let pages = CannedPages::default().with(feed_url(CHANNEL), SAMPLE_FEED);
        let rss = YoutubeRss::with_fetcher(pages);
        let details = rss.latest_videos_with_details(CHANNEL, 0).await.unwrap();

        assert_eq!(details[0].video_type, VideoType::LiveContents);
        assert_eq!(details[0].live_status, LiveStatus::Upcoming);
    }

    #[tokio::test]
    async fn test_video_detail_standalone() {
        let rss = channel_fixture();
        let detail = rss.video_detail("vid00000001").await.unwrap();
        assert_eq!(detail.url, "https://www.youtube.com/watch?v=vid00000001");
        assert_eq!(detail.published, "");
        assert_eq!(detail.video_type, VideoType::LiveContents);

        assert!(rss.video_detail("vid00000003").await.is_err());
        assert!(matches!(
            rss.video_detail("  ").await,
            Err(ExtractorError::VideoNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_latest_video_info_probes_status() {
        let pages = CannedPages::default()
            .with(feed_url(CHANNEL), SAMPLE_FEED)
            .with(watch_url("vid00000001"), r#""isLive":true"#);
        let rss = YoutubeRss::with_fetcher(pages);

        let latest = rss.latest_video_info(CHANNEL).await.unwrap().unwrap();
        assert_eq!(latest.video_id, "vid00000001");
        assert_eq!(latest.live_status, Some(LiveStatus::Live));
        assert_eq!(rss.live_status("vid00000003").await, LiveStatus::None);
    }

    #[tokio::test]
    async fn test_owner_image() {
        let pages = CannedPages::default().with(
            channel_url(CHANNEL),
            r#"<meta property="og:image" content="https://yt3.googleusercontent.com/a">"#,
        );
        let rss = YoutubeRss::with_fetcher(pages);
        assert_eq!(
            rss.channel_owner_image(CHANNEL).await.unwrap().as_deref(),
            Some("https://yt3.googleusercontent.com/a")
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_youtube_channel_live() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();

        let client = crate::extractor::default_client().unwrap();
        let rss = YoutubeRss::new(client, None);
        let channel_id = rss
            .extract_channel_id("https://www.youtube.com/@GoogleJapan")
            .await
            .unwrap();
        let details = rss
            .latest_videos_with_details(&channel_id, DEFAULT_DETAIL_CONCURRENCY)
            .await
            .unwrap();
        println!("{details:#?}");
    }

    #[test]
    fn test_url_regex() {
        assert!(URL_REGEX.is_match("https://www.youtube.com/@GoogleJapan"));
        assert!(URL_REGEX.is_match("youtube.com/channel/UCabc"));
        assert!(!URL_REGEX.is_match("https://twitch.tv/someone"));
    }
}

//! Video type and live status decisions.
//!
//! Everything here is a pure function of its inputs. Callers that want to
//! log the intermediate signals should call [`Signals::collect`] themselves
//! and pass the result to [`classify_signals`].

use super::signals::{self, Signals};
use crate::video::{LiveStatus, VideoType};

/// Feed-level fields the classifier looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryFields<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> SummaryFields<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }
}

pub fn classify_type_and_status(
    fields: &SummaryFields<'_>,
    html: Option<&str>,
) -> (VideoType, LiveStatus) {
    let signals = Signals::collect(fields.url, fields.title, fields.description, html);
    classify_signals(&signals)
}

pub fn classify_signals(signals: &Signals) -> (VideoType, LiveStatus) {
    let video_type = decide_type(signals);
    (video_type, decide_live_status(signals, video_type))
}

/// Type rules, first match wins. The order is the precedence.
pub fn decide_type(signals: &Signals) -> VideoType {
    let is_live_now = signals.is_live_now();

    if signals.is_shorts {
        return VideoType::Shorts;
    }
    if signals.is_live_content.is_true() {
        return if is_live_now.is_true() {
            VideoType::IsLive
        } else {
            VideoType::LiveContents
        };
    }
    if signals.is_live_content.is_false() {
        return VideoType::Normal;
    }
    if signals.live_broadcast.is_some() {
        return if is_live_now.is_true() {
            VideoType::IsLive
        } else {
            VideoType::LiveContents
        };
    }
    if signals.has_live_keyword {
        return VideoType::LiveContents;
    }
    VideoType::Normal
}

pub fn decide_live_status(signals: &Signals, video_type: VideoType) -> LiveStatus {
    let broadcast = signals.live_broadcast.as_ref();

    if signals.is_live_now().is_true() {
        return LiveStatus::Live;
    }
    if signals.is_live_now().is_false() {
        let ended = broadcast.is_some_and(|b| b.end_timestamp.is_some());
        return if ended {
            LiveStatus::Ended
        } else {
            LiveStatus::Upcoming
        };
    }
    if video_type == VideoType::LiveContents {
        return LiveStatus::Upcoming;
    }
    LiveStatus::None
}

/// Classification for listings built from the feed alone.
pub fn classify_by_url_only(url: &str) -> VideoType {
    if signals::is_shorts_url(url) {
        VideoType::Shorts
    } else {
        VideoType::Normal
    }
}

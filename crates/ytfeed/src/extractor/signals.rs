//! Named extractors over watch-page markup.
//!
//! Each extractor looks for one declaration in the raw page and yields a typed
//! signal, or nothing. None of them can fail: a missing or malformed fragment
//! is simply an absent signal.

use crate::video::TriState;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const SHORTS_PATH_MARKER: &str = "/shorts/";

const CANONICAL_SHORTS_MARKER: &str = r#""canonicalUrl":"https://www.youtube.com/shorts/"#;
const SHORTS_URL_MARKER: &str = r#""shortsUrl":"https://www.youtube.com/shorts/"#;

static IS_LIVE_CONTENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""isLiveContent"\s*:\s*(true|false)"#).unwrap());

static LIVE_BROADCAST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""liveBroadcastDetails"\s*:\s*\{([^}]*)\}"#).unwrap());

static IS_LIVE_NOW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""isLiveNow"\s*:\s*(true|false)"#).unwrap());

static START_TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""startTimestamp"\s*:\s*"([^"]+)""#).unwrap());

static END_TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""endTimestamp"\s*:\s*"([^"]+)""#).unwrap());

// "live", "broadcast", "streaming" and their Japanese forms
static LIVE_KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ライブ|配信|生放送|live").unwrap());

/// Contents of a page's `liveBroadcastDetails` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveBroadcastSignal {
    pub is_live_now: TriState,
    pub start_timestamp: Option<String>,
    pub end_timestamp: Option<String>,
}

/// Every signal the classifier consumes, extracted in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub is_shorts: bool,
    pub is_live_content: TriState,
    pub live_broadcast: Option<LiveBroadcastSignal>,
    pub has_live_keyword: bool,
}

impl Signals {
    pub fn collect(
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        html: Option<&str>,
    ) -> Self {
        let html = html.filter(|h| !h.is_empty());

        let is_shorts = is_shorts_url(url) || html.is_some_and(page_declares_shorts);
        let is_live_content = html.map_or(TriState::Unknown, extract_is_live_content);
        let live_broadcast = html.and_then(extract_live_broadcast);
        let has_live_keyword = title.is_some_and(has_live_keyword)
            || description.is_some_and(has_live_keyword);

        Self {
            is_shorts,
            is_live_content,
            live_broadcast,
            has_live_keyword,
        }
    }

    /// `isLiveNow` of the broadcast fragment, `Unknown` when there is none.
    pub fn is_live_now(&self) -> TriState {
        self.live_broadcast
            .as_ref()
            .map_or(TriState::Unknown, |b| b.is_live_now)
    }
}

pub fn is_shorts_url(url: &str) -> bool {
    url.contains(SHORTS_PATH_MARKER)
}

/// True when the page names a shorts URL as its canonical or shorts link.
pub fn page_declares_shorts(html: &str) -> bool {
    html.contains(CANONICAL_SHORTS_MARKER) || html.contains(SHORTS_URL_MARKER)
}

pub fn extract_is_live_content(html: &str) -> TriState {
    IS_LIVE_CONTENT_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(TriState::Unknown, |m| TriState::from_literal(m.as_str()))
}

/// Reads the first `liveBroadcastDetails` object.
///
/// The object is only scanned up to its first closing brace. It counts as
/// present even when none of its fields could be read.
pub fn extract_live_broadcast(html: &str) -> Option<LiveBroadcastSignal> {
    let fragment = LIVE_BROADCAST_REGEX.captures(html)?.get(1)?.as_str();

    let is_live_now = IS_LIVE_NOW_REGEX
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map_or(TriState::Unknown, |m| TriState::from_literal(m.as_str()));
    let capture = |regex: &Regex| {
        regex
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    };

    Some(LiveBroadcastSignal {
        is_live_now,
        start_timestamp: capture(&START_TIMESTAMP_REGEX),
        end_timestamp: capture(&END_TIMESTAMP_REGEX),
    })
}

pub fn has_live_keyword(text: &str) -> bool {
    !text.is_empty() && LIVE_KEYWORD_REGEX.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorts_markers() {
        assert!(is_shorts_url("https://www.youtube.com/shorts/abc123"));
        assert!(!is_shorts_url("https://www.youtube.com/watch?v=abc123"));
        assert!(!is_shorts_url(""));

        let html = r#"{"canonicalUrl":"https://www.youtube.com/shorts/abc123"}"#;
        assert!(page_declares_shorts(html));
        let html = r#"{"shortsUrl":"https://www.youtube.com/shorts/abc123"}"#;
        assert!(page_declares_shorts(html));
        let html = r#"{"canonicalUrl":"https://www.youtube.com/watch?v=abc123"}"#;
        assert!(!page_declares_shorts(html));
    }

    #[test]
    fn test_is_live_content_first_match_wins() {
        assert_eq!(
            extract_is_live_content(r#""isLiveContent" : true,"isLiveContent":false"#),
            TriState::True
        );
        assert_eq!(
            extract_is_live_content(r#""isLiveContent":false"#),
            TriState::False
        );
        assert_eq!(
            extract_is_live_content(r#""isLiveContent":"yes""#),
            TriState::Unknown
        );
    }

    #[test]
    fn test_live_broadcast_fields() {
        let html = r#"x"liveBroadcastDetails":{"isLiveNow":false,"startTimestamp":"2024-05-01T10:00:00+00:00","endTimestamp":"2024-05-01T12:00:00+00:00"},"y":1"#;
        let signal = extract_live_broadcast(html).unwrap();
        assert_eq!(signal.is_live_now, TriState::False);
        assert_eq!(
            signal.start_timestamp.as_deref(),
            Some("2024-05-01T10:00:00+00:00")
        );
        assert_eq!(
            signal.end_timestamp.as_deref(),
            Some("2024-05-01T12:00:00+00:00")
        );
    }

    #[test]
    fn test_live_broadcast_without_fields_is_present() {
        let signal = extract_live_broadcast(r#""liveBroadcastDetails": {}"#).unwrap();
        assert_eq!(signal, LiveBroadcastSignal::default());
        assert!(extract_live_broadcast(r#""liveBroadcastDetails":"#).is_none());
    }

    #[test]
    fn test_live_broadcast_fields_outside_fragment_are_ignored() {
        let html = r#""liveBroadcastDetails":{"startTimestamp":"t0"},"isLiveNow":true"#;
        let signal = extract_live_broadcast(html).unwrap();
        assert_eq!(signal.is_live_now, TriState::Unknown);
        assert_eq!(signal.start_timestamp.as_deref(), Some("t0"));
    }

    #[test]
    fn test_live_keywords() {
        assert!(has_live_keyword("【LIVE】 late night stream"));
        assert!(has_live_keyword("Live coding"));
        assert!(has_live_keyword("今夜は生放送"));
        assert!(has_live_keyword("雑談配信"));
        assert!(has_live_keyword("ライブ告知"));
        assert!(!has_live_keyword("Cooking pasta"));
        assert!(!has_live_keyword(""));
    }

    #[test]
    fn test_empty_html_yields_no_signals() {
        let signals = Signals::collect("https://www.youtube.com/watch?v=a", None, None, Some(""));
        assert_eq!(signals, Signals::default());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of upload a video is, as far as the public markup lets us tell.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    Normal,
    Shorts,
    /// Any live broadcast: upcoming, running or archived.
    LiveContents,
    /// A broadcast that is on air right now.
    IsLive,
    Unknown,
}

impl VideoType {
    pub const ALL: [VideoType; 5] = [
        VideoType::Normal,
        VideoType::Shorts,
        VideoType::LiveContents,
        VideoType::IsLive,
        VideoType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::Normal => "normal",
            VideoType::Shorts => "shorts",
            VideoType::LiveContents => "live_contents",
            VideoType::IsLive => "is_live",
            VideoType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    #[default]
    None,
    Upcoming,
    Live,
    Ended,
}

impl LiveStatus {
    pub const ALL: [LiveStatus; 4] = [
        LiveStatus::None,
        LiveStatus::Upcoming,
        LiveStatus::Live,
        LiveStatus::Ended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LiveStatus::None => "none",
            LiveStatus::Upcoming => "upcoming",
            LiveStatus::Live => "live",
            LiveStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean flag scraped from markup that may not be there at all.
///
/// Kept distinct from `Option<bool>` so that "not declared" can never be
/// read as `false` by accident.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    #[default]
    Unknown,
    True,
    False,
}

impl TriState {
    /// Parses the literal `true` / `false` captured from page JSON.
    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "true" => TriState::True,
            "false" => TriState::False,
            _ => TriState::Unknown,
        }
    }

    pub fn is_true(self) -> bool {
        self == TriState::True
    }

    pub fn is_false(self) -> bool {
        self == TriState::False
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Unknown => write!(f, "unknown"),
            TriState::True => write!(f, "true"),
            TriState::False => write!(f, "false"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_from_literal() {
        assert_eq!(TriState::from_literal("true"), TriState::True);
        assert_eq!(TriState::from_literal("false"), TriState::False);
        assert_eq!(TriState::from_literal("TRUE"), TriState::Unknown);
        assert!(!TriState::Unknown.is_false());
        assert!(!TriState::Unknown.is_true());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&VideoType::LiveContents).unwrap(),
            "\"live_contents\""
        );
        assert_eq!(
            serde_json::to_string(&VideoType::IsLive).unwrap(),
            "\"is_live\""
        );
        assert_eq!(
            serde_json::from_str::<LiveStatus>("\"upcoming\"").unwrap(),
            LiveStatus::Upcoming
        );
        for t in VideoType::ALL {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{t}\""));
        }
    }
}

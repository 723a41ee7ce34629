use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use std::borrow::Cow;
use std::io::Write;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};
use ytfeed_parser::{
    extractor::signals::Signals,
    video::{LiveStatus, VideoDetail, VideoPageResult, VideoSummary, VideoType},
};

/// Per-type and per-status tallies of a classified listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    pub by_type: Vec<(VideoType, usize)>,
    pub by_status: Vec<(LiveStatus, usize)>,
}

impl Counts {
    pub fn of(details: &[VideoDetail]) -> Self {
        let by_type = VideoType::ALL
            .iter()
            .map(|t| (*t, details.iter().filter(|d| d.video_type == *t).count()))
            .collect();
        let by_status = LiveStatus::ALL
            .iter()
            .map(|s| (*s, details.iter().filter(|d| d.live_status == *s).count()))
            .collect();
        Self { by_type, by_status }
    }
}

#[cfg(feature = "table-output")]
#[derive(Tabled)]
struct VideoRow<'a> {
    id: &'a str,
    #[tabled(rename = "type")]
    video_type: Cow<'a, str>,
    status: Cow<'a, str>,
    published: &'a str,
    title: &'a str,
}

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_page(&self, page: &VideoPageResult, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(page)?),
            OutputFormat::Csv => Ok(Self::summaries_csv(&page.videos)),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => Ok(Self::summaries_table(&page.videos)),
            _ => {
                let mut output = String::new();
                output.push_str(&self.colorize(
                    &format!(
                        "Videos (page {}, {} of {}):",
                        page.page,
                        page.videos.len(),
                        page.total
                    ),
                    &Color::Green,
                    true,
                ));
                output.push('\n');
                for video in &page.videos {
                    output.push_str(&self.summary_line(video));
                }
                Ok(output)
            }
        }
    }

    pub fn format_summary(&self, video: &VideoSummary, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(video)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(video)?),
            OutputFormat::Csv => Ok(Self::summaries_csv(std::slice::from_ref(video))),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => Ok(Self::summaries_table(std::slice::from_ref(video))),
            _ => Ok(self.summary_line(video)),
        }
    }

    /// Details grouped by type, followed by live status counts.
    pub fn format_details(&self, details: &[VideoDetail], format: &OutputFormat) -> Result<String> {
        let counts = Counts::of(details);
        match format {
            OutputFormat::Json | OutputFormat::JsonCompact => {
                let value = serde_json::json!({
                    "videos": details,
                    "counts": {
                        "type": counts.by_type.iter().map(|(t, n)| (t.to_string(), *n)).collect::<std::collections::BTreeMap<_, _>>(),
                        "live_status": counts.by_status.iter().map(|(s, n)| (s.to_string(), *n)).collect::<std::collections::BTreeMap<_, _>>(),
                    }
                });
                Ok(if matches!(format, OutputFormat::Json) {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                })
            }
            OutputFormat::Csv => Ok(Self::details_csv(details)),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => {
                let rows = details.iter().map(|d| VideoRow {
                    id: &d.video_id,
                    video_type: Cow::Owned(d.video_type.to_string()),
                    status: Cow::Owned(d.live_status.to_string()),
                    published: &d.published,
                    title: &d.title,
                });
                Ok(Table::new(rows).with(Style::modern()).to_string())
            }
            _ => {
                let mut output = String::new();
                for (video_type, count) in &counts.by_type {
                    if *count == 0 {
                        continue;
                    }
                    output.push_str(&self.colorize(
                        &format!("{} ({count}):", video_type.as_str().to_uppercase()),
                        &Color::Green,
                        true,
                    ));
                    output.push('\n');
                    for d in details.iter().filter(|d| d.video_type == *video_type) {
                        output.push_str(&format!(
                            "  {} | {} | {} | {}\n",
                            self.colorize(&d.video_id, &Color::Cyan, false),
                            d.title,
                            self.colorize(d.live_status.as_str(), &Color::Yellow, false),
                            self.colorize(&d.image_url, &Color::Blue, false)
                        ));
                    }
                }
                output.push('\n');
                output.push_str(&self.colorize("Live status:", &Color::Green, true));
                output.push('\n');
                for (status, count) in &counts.by_status {
                    output.push_str(&format!(
                        "  {}: {count}\n",
                        self.colorize(status.as_str(), &Color::Yellow, false)
                    ));
                }
                Ok(output)
            }
        }
    }

    pub fn format_detail(&self, detail: &VideoDetail, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(detail)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(detail)?),
            OutputFormat::Csv => Ok(Self::details_csv(std::slice::from_ref(detail))),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => self.format_details(std::slice::from_ref(detail), format),
            _ => {
                let mut output = String::new();
                output.push_str(&self.colorize("Video Information:", &Color::Green, true));
                output.push('\n');
                for (label, value) in [
                    ("Id", detail.video_id.as_str()),
                    ("Title", detail.title.as_str()),
                    ("Author", detail.author.as_str()),
                    ("Published", detail.published.as_str()),
                    ("URL", detail.url.as_str()),
                    ("Type", detail.video_type.as_str()),
                    ("Live Status", detail.live_status.as_str()),
                    ("Image URL", detail.image_url.as_str()),
                ] {
                    output.push_str(&self.field(label, value));
                }
                if !detail.description.is_empty() {
                    output.push_str(&self.field("Description", &detail.description));
                }
                Ok(output)
            }
        }
    }

    pub fn format_classification(
        &self,
        url: &str,
        signals: &Signals,
        classification: (VideoType, LiveStatus),
        format: &OutputFormat,
    ) -> Result<String> {
        let (video_type, live_status) = classification;
        let value = serde_json::json!({
            "url": url,
            "type": video_type,
            "live_status": live_status,
            "signals": signals,
        });
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(&value)?),
            OutputFormat::Csv => Ok(format!(
                "url,type,live_status\n\"{}\",{video_type},{live_status}\n",
                Self::escape_csv(url)
            )),
            _ => {
                let mut output = String::new();
                output.push_str(&self.field("Type", video_type.as_str()));
                output.push_str(&self.field("Live Status", live_status.as_str()));
                output.push_str(&self.field("Shorts", &signals.is_shorts.to_string()));
                output.push_str(&self.field("Live Content", &signals.is_live_content.to_string()));
                output.push_str(&self.field("Live Now", &signals.is_live_now().to_string()));
                output.push_str(&self.field("Keyword", &signals.has_live_keyword.to_string()));
                Ok(output)
            }
        }
    }

    /// A single named value, e.g. a channel id.
    pub fn format_value(&self, label: &str, value: &str, format: &OutputFormat) -> Result<String> {
        let mut object = serde_json::Map::new();
        object.insert(label.to_string(), value.into());
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&object)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(&object)?),
            OutputFormat::Csv => Ok(format!("{label}\n\"{}\"\n", Self::escape_csv(value))),
            _ => Ok(format!("{value}\n")),
        }
    }

    fn summary_line(&self, video: &VideoSummary) -> String {
        let video_type = video.video_type.map_or("-", |t| t.as_str());
        let mut line = format!(
            "  {} | {} | {} | {}",
            self.colorize(&video.video_id, &Color::Cyan, false),
            self.colorize(video_type, &Color::Yellow, false),
            video.published,
            video.title
        );
        if let Some(status) = video.live_status {
            line.push_str(&format!(" | {}", self.colorize(status.as_str(), &Color::Yellow, false)));
        }
        line.push('\n');
        line
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!(
            "  {}: {}\n",
            self.colorize(label, &Color::Yellow, false),
            self.colorize(value, &Color::Cyan, false)
        )
    }

    #[cfg(feature = "table-output")]
    fn summaries_table(videos: &[VideoSummary]) -> String {
        let rows = videos.iter().map(|v| VideoRow {
            id: &v.video_id,
            video_type: Cow::Borrowed(v.video_type.map_or("-", |t| t.as_str())),
            status: Cow::Borrowed(v.live_status.map_or("-", |s| s.as_str())),
            published: &v.published,
            title: &v.title,
        });
        Table::new(rows).with(Style::modern()).to_string()
    }

    fn summaries_csv(videos: &[VideoSummary]) -> String {
        let mut output = String::from("video_id,type,published,title,url\n");
        for v in videos {
            output.push_str(&format!(
                "\"{}\",{},\"{}\",\"{}\",\"{}\"\n",
                Self::escape_csv(&v.video_id),
                v.video_type.map_or("", |t| t.as_str()),
                Self::escape_csv(&v.published),
                Self::escape_csv(&v.title),
                Self::escape_csv(&v.url)
            ));
        }
        output
    }

    fn details_csv(details: &[VideoDetail]) -> String {
        let mut output = String::from("video_id,type,live_status,published,title,image_url\n");
        for d in details {
            output.push_str(&format!(
                "\"{}\",{},{},\"{}\",\"{}\",\"{}\"\n",
                Self::escape_csv(&d.video_id),
                d.video_type,
                d.live_status,
                Self::escape_csv(&d.published),
                Self::escape_csv(&d.title),
                Self::escape_csv(&d.image_url)
            ));
        }
        output
    }

    // Helper method to avoid unnecessary allocations when escaping CSV
    fn escape_csv(s: &str) -> Cow<'_, str> {
        if s.contains('"') {
            Cow::Owned(s.replace('"', "\"\""))
        } else {
            Cow::Borrowed(s)
        }
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (self.colored, color, bold);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

pub fn write_output(content: &str) -> Result<()> {
    print!("{content}");
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str, video_type: VideoType, live_status: LiveStatus) -> VideoDetail {
        VideoDetail {
            video_id: id.to_string(),
            title: format!("title \"{id}\""),
            author: "Sample Channel".to_string(),
            published: String::new(),
            url: format!("https://www.youtube.com/watch?v={id}"),
            description: String::new(),
            thumbnails: vec![],
            image_url: VideoDetail::default_image_url(id),
            video_type,
            live_status,
        }
    }

    fn sample() -> Vec<VideoDetail> {
        vec![
            detail("a", VideoType::Shorts, LiveStatus::None),
            detail("b", VideoType::LiveContents, LiveStatus::Ended),
            detail("c", VideoType::LiveContents, LiveStatus::Upcoming),
            detail("d", VideoType::Normal, LiveStatus::None),
        ]
    }

    #[test]
    fn test_counts() {
        let counts = Counts::of(&sample());
        assert!(counts.by_type.contains(&(VideoType::LiveContents, 2)));
        assert!(counts.by_type.contains(&(VideoType::IsLive, 0)));
        assert!(counts.by_status.contains(&(LiveStatus::None, 2)));
        assert!(counts.by_status.contains(&(LiveStatus::Ended, 1)));
    }

    #[test]
    fn test_pretty_groups_by_type() {
        let output = OutputManager::new(false)
            .format_details(&sample(), &OutputFormat::Pretty)
            .unwrap();
        assert!(output.contains("LIVE_CONTENTS (2):"));
        assert!(output.contains("SHORTS (1):"));
        assert!(!output.contains("IS_LIVE"));
        assert!(output.contains("  upcoming: 1\n"));
    }

    #[test]
    fn test_json_counts() {
        let output = OutputManager::new(false)
            .format_details(&sample(), &OutputFormat::JsonCompact)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["counts"]["type"]["live_contents"], 2);
        assert_eq!(value["counts"]["live_status"]["ended"], 1);
        assert_eq!(value["videos"][1]["type"], "live_contents");
    }

    #[test]
    fn test_value_as_json() {
        let output = OutputManager::new(false)
            .format_value("channel_id", "UCabc", &OutputFormat::JsonCompact)
            .unwrap();
        assert_eq!(output, r#"{"channel_id":"UCabc"}"#);
    }

    #[test]
    fn test_csv_escapes_quotes() {
        let output = OutputManager::new(false)
            .format_details(&sample()[..1], &OutputFormat::Csv)
            .unwrap();
        assert!(output.contains("\"title \"\"a\"\"\""));
    }
}

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ytfeed",
    about = "ytfeed - list YouTube channel feeds and classify shorts, lives and uploads",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Number of retry attempts (overrides the configuration)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Output format (overrides the configuration)
    #[arg(short, long, global = true)]
    pub output: Option<OutputFormat>,

    /// Cookies sent with every request, e.g. "CONSENT=YES+1"
    #[arg(long, global = true)]
    pub cookies: Option<String>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a channel URL (/channel, /c, /user or /@handle) to its id
    ChannelId {
        /// Channel URL
        url: String,
    },

    /// Show channel name and owner image
    Channel {
        /// Channel id or channel URL
        channel: String,
    },

    /// List the latest videos of a channel
    Videos {
        /// Channel id or channel URL
        channel: String,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Videos per page
        #[arg(long, default_value = "15")]
        page_size: usize,

        /// Fetch every watch page and classify it
        #[arg(short, long)]
        details: bool,

        /// Maximum concurrent watch page fetches (overrides the configuration)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Only show the newest video together with its live status
        #[arg(long, conflicts_with = "details")]
        latest: bool,
    },

    /// Fetch and classify a single video
    Detail {
        /// Video id
        video_id: String,
    },

    /// Probe the live status of a video
    LiveStatus {
        /// Video id
        video_id: String,
    },

    /// Print the channel owner's avatar URL
    OwnerImage {
        /// Channel id or channel URL
        channel: String,
    },

    /// Classify a video offline from its URL, title, description and saved page
    Classify {
        /// Video URL
        #[arg(short, long)]
        url: String,

        /// Video title
        #[arg(short, long)]
        title: Option<String>,

        /// Video description
        #[arg(short, long)]
        description: Option<String>,

        /// Saved watch page
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty-printed human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
    /// Table format
    Table,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonCompact => write!(f, "json-compact"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_videos_with_details() {
        let args = Args::try_parse_from([
            "ytfeed",
            "videos",
            "UCxxxxxxxxxxxxxxxxxxxxxx",
            "--details",
            "--concurrency",
            "5",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output, Some(OutputFormat::Json));
        match args.command {
            Commands::Videos {
                details,
                concurrency,
                page,
                ..
            } => {
                assert!(details);
                assert_eq!(concurrency, Some(5));
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_latest_conflicts_with_details() {
        assert!(Args::try_parse_from(["ytfeed", "videos", "UC1", "--details", "--latest"]).is_err());
    }
}

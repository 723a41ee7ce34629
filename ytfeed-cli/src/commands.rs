use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{CliError, Result},
    output::{OutputManager, write_output},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, path::Path, time::Duration};
use tokio::time::{sleep, timeout};
use tracing::{debug, info};
use ytfeed_parser::{
    VERSION,
    extractor::{
        ClientOptions, ProxyConfig,
        classifier::classify_signals,
        create_client,
        error::ExtractorError,
        platforms::youtube::{URL_REGEX, YoutubeRss, channel_url},
        signals::Signals,
    },
};

pub struct CommandExecutor {
    config: AppConfig,
    rss: YoutubeRss,
    output_manager: OutputManager,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Result<Self> {
        let proxy = config.default_proxy.as_ref().map(|url| ProxyConfig {
            url: url.clone(),
            username: config.default_proxy_username.clone(),
            password: config.default_proxy_password.clone(),
        });

        let options = ClientOptions::default()
            .with_proxy(proxy)
            .with_timeout(Duration::from_secs(config.default_timeout))
            .with_user_agent(config.user_agent.clone())
            .with_accept_language(config.accept_language.clone());
        let client = create_client(options)?;
        let rss = YoutubeRss::new(client, config.default_cookies.clone());
        let output_manager = OutputManager::new(config.colored_output);

        Ok(Self {
            config,
            rss,
            output_manager,
        })
    }

    fn format(&self) -> &OutputFormat {
        &self.config.default_output_format
    }

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.config.default_timeout)
    }

    /// Accepts either a bare channel id or any channel URL.
    async fn resolve_channel(&self, channel: &str) -> Result<String> {
        let channel = channel.trim();
        if channel.is_empty() {
            return Err(CliError::invalid_input("channel must not be empty"));
        }
        if !URL_REGEX.is_match(channel) {
            return Ok(channel.to_string());
        }
        self.with_retry(|| self.rss.extract_channel_id(channel)).await
    }

    pub async fn channel_id(&self, url: &str) -> Result<()> {
        let pb = self.create_progress_bar("Resolving channel id...");
        let id = self.with_retry(|| self.rss.extract_channel_id(url)).await;
        pb.finish_and_clear();
        let id = id?;

        info!("Resolved {} to {}", url, id);
        write_output(&self.output_manager.format_value("channel_id", &id, self.format())?)
    }

    pub async fn channel(&self, channel: &str) -> Result<()> {
        let channel_id = self.resolve_channel(channel).await?;

        let pb = self.create_progress_bar("Fetching channel...");
        let name = self.with_retry(|| self.rss.channel_name(&channel_id)).await;
        let image = if name.is_ok() {
            self.with_retry(|| self.rss.channel_owner_image(&channel_id)).await
        } else {
            Ok(None)
        };
        pb.finish_and_clear();
        let name = name?;
        let image = image?;

        let value = serde_json::json!({
            "channel_id": channel_id,
            "name": name,
            "url": channel_url(&channel_id),
            "owner_image": image,
            "ytfeed_version": VERSION,
        });
        let content = match self.format() {
            OutputFormat::Json => serde_json::to_string_pretty(&value)?,
            OutputFormat::JsonCompact => serde_json::to_string(&value)?,
            _ => format!(
                "{name} ({channel_id})\n{}\n{}\n",
                channel_url(&channel_id),
                image.as_deref().unwrap_or("no owner image")
            ),
        };
        write_output(&content)
    }

    pub async fn videos(
        &self,
        channel: &str,
        page: usize,
        page_size: usize,
        details: bool,
        concurrency: Option<usize>,
        latest: bool,
    ) -> Result<()> {
        let channel_id = self.resolve_channel(channel).await?;

        if latest {
            let pb = self.create_progress_bar("Fetching latest video...");
            let video = self.with_retry(|| self.rss.latest_video_info(&channel_id)).await;
            pb.finish_and_clear();
            let video = video?.ok_or(CliError::NoVideos)?;
            return write_output(&self.output_manager.format_summary(&video, self.format())?);
        }

        if details {
            let concurrency = concurrency.unwrap_or(self.config.detail_concurrency);
            debug!("Fetching details with concurrency {}", concurrency);

            // only the feed request is retried; page fetches degrade on their own
            let pb = self.create_progress_bar("Fetching feed...");
            let videos = self.with_retry(|| self.rss.latest_videos(&channel_id)).await;
            let details = match videos {
                Ok(videos) if !videos.is_empty() => {
                    pb.set_message(format!("Fetching and classifying {} videos...", videos.len()));
                    Ok(self.rss.details_for(&videos, concurrency).await)
                }
                Ok(_) => Err(CliError::NoVideos),
                Err(e) => Err(e),
            };
            pb.finish_and_clear();
            let details = details?;
            return write_output(&self.output_manager.format_details(&details, self.format())?);
        }

        let pb = self.create_progress_bar("Fetching feed...");
        let result = self
            .with_retry(|| self.rss.videos_with_paging(&channel_id, page, page_size))
            .await;
        pb.finish_and_clear();
        let page = result?;
        if page.total == 0 {
            return Err(CliError::NoVideos);
        }
        write_output(&self.output_manager.format_page(&page, self.format())?)
    }

    pub async fn detail(&self, video_id: &str) -> Result<()> {
        let pb = self.create_progress_bar("Fetching video...");
        let detail = self.with_retry(|| self.rss.video_detail(video_id)).await;
        pb.finish_and_clear();
        write_output(&self.output_manager.format_detail(&detail?, self.format())?)
    }

    pub async fn live_status(&self, video_id: &str) -> Result<()> {
        let pb = self.create_progress_bar("Probing live status...");
        let status = timeout(self.timeout_duration(), self.rss.live_status(video_id)).await;
        pb.finish_and_clear();
        let status = status.map_err(|_| CliError::timeout(self.config.default_timeout))?;

        write_output(
            &self
                .output_manager
                .format_value("live_status", status.as_str(), self.format())?,
        )
    }

    pub async fn owner_image(&self, channel: &str) -> Result<()> {
        let channel_id = self.resolve_channel(channel).await?;

        let pb = self.create_progress_bar("Fetching channel page...");
        let image = self.with_retry(|| self.rss.channel_owner_image(&channel_id)).await;
        pb.finish_and_clear();
        let image = image?.ok_or_else(|| {
            CliError::invalid_input(format!("channel {channel_id} has no owner image"))
        })?;

        write_output(&self.output_manager.format_value("owner_image", &image, self.format())?)
    }

    /// Runs the classifier on local inputs only.
    pub fn classify(
        &self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
        html_path: Option<&Path>,
    ) -> Result<()> {
        let html = html_path.map(std::fs::read_to_string).transpose()?;
        let signals = Signals::collect(url, title, description, html.as_deref());
        let classification = classify_signals(&signals);
        debug!("Signals for {}: {:?}", url, signals);

        write_output(&self.output_manager.format_classification(
            url,
            &signals,
            classification,
            self.format(),
        )?)
    }

    fn create_progress_bar(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb
    }

    /// Retries `op` with exponential backoff, each attempt bounded by the
    /// configured timeout.
    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, ExtractorError>>,
    {
        let retries = self.config.default_retries;
        let mut last_error = None;

        for attempt in 0..=retries {
            match timeout(self.timeout_duration(), op()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if !is_retryable(&e) => return Err(e.into()),
                Ok(Err(e)) => {
                    debug!("Attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e.into());
                }
                Err(_) => {
                    debug!("Attempt {} timed out", attempt + 1);
                    last_error = Some(CliError::timeout(self.config.default_timeout));
                }
            }
            if attempt < retries {
                sleep(backoff_delay(attempt)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| CliError::timeout(self.config.default_timeout)))
    }
}

/// Input and parse errors fail the same way every time.
fn is_retryable(error: &ExtractorError) -> bool {
    matches!(
        error,
        ExtractorError::HttpError(_) | ExtractorError::HttpStatus { .. }
    )
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << attempt.min(6)))
}

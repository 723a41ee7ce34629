mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::{Args, Commands},
    commands::CommandExecutor,
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    match args.command {
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            return Ok(());
        }
        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                let config = AppConfig::load(args.config.as_deref())?;
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
            return Ok(());
        }
        _ => {}
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.default_timeout = timeout;
    }
    if let Some(retries) = args.retries {
        config.default_retries = retries;
    }
    if let Some(output) = args.output {
        config.default_output_format = output;
    }
    if args.cookies.is_some() {
        config.default_cookies = args.cookies;
    }
    if args.proxy.is_some() {
        config.default_proxy = args.proxy;
        config.default_proxy_username = args.proxy_username;
        config.default_proxy_password = args.proxy_password;
    }
    debug!("Starting ytfeed with config: {:?}", config);

    let executor = CommandExecutor::new(config)?;

    match args.command {
        Commands::ChannelId { url } => executor.channel_id(&url).await?,
        Commands::Channel { channel } => executor.channel(&channel).await?,
        Commands::Videos {
            channel,
            page,
            page_size,
            details,
            concurrency,
            latest,
        } => {
            executor
                .videos(&channel, page, page_size, details, concurrency, latest)
                .await?
        }
        Commands::Detail { video_id } => executor.detail(&video_id).await?,
        Commands::LiveStatus { video_id } => executor.live_status(&video_id).await?,
        Commands::OwnerImage { channel } => executor.owner_image(&channel).await?,
        Commands::Classify {
            url,
            title,
            description,
            html,
        } => executor.classify(&url, title.as_deref(), description.as_deref(), html.as_deref())?,
        Commands::Completions { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();
}

//! Issuesync CLI entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use issuesync::cli::{Cli, Commands};
use issuesync::domain::models::Config;
use issuesync::infrastructure::config::ConfigLoader;
use issuesync::infrastructure::github::GithubClient;
use issuesync::infrastructure::sink::SinkClient;
use issuesync::services::CycleDriver;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let fmt_layer = if config.logging.format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration errors are fatal: the process never enters the cycle
    // loop misconfigured.
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConfigLoader::load().context("loading config")?,
    };
    if cli.dry_run {
        config.sync.dry_run = true;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    ConfigLoader::validate(&config).context("invalid configuration")?;

    init_tracing(&config);

    if config.sync.dry_run {
        warn!("dry-run mode enabled; no mutating calls will be made");
    }
    info!(
        dedup_strategy = config.sync.dedup_strategy.as_str(),
        interval_secs = config.sync.interval_secs,
        "issuesync starting"
    );

    let source = Arc::new(GithubClient::new(&config.source)?);
    let sink = Arc::new(SinkClient::new(&config.sink)?);
    let driver = CycleDriver::new(source, sink, config.sync.clone());

    match cli.command {
        Commands::Run => driver.run_loop().await,
        Commands::Once => {
            // Partial failures surface in the summary counts, not the exit
            // code; an aborted cycle is an error event, nothing more.
            if let Err(err) = driver.run_once().await {
                error!(error = %err, "cycle aborted");
            }
        }
    }

    Ok(())
}

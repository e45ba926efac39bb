//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl web crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config};
use ripple_crawl::crawler::{Crawler, HttpDownloader};
use ripple_crawl::output::{print_result, print_statistics, CrawlStatistics};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a bounded-concurrency breadth-first web crawler
///
/// Downloads the seed URL and follows its links level by level, never
/// exceeding the configured number of downloads per host.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A bounded-concurrency breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Number of BFS levels to download (1 = seed only)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Download worker pool size
    #[arg(long)]
    downloaders: Option<usize>,

    /// Link extraction worker pool size
    #[arg(long)]
    extractors: Option<usize>,

    /// Maximum concurrent downloads per host
    #[arg(long)]
    per_host: Option<usize>,

    /// Only download from this host (repeatable)
    #[arg(long = "host", value_name = "HOST")]
    hosts: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let depth = config.crawler.depth;
    let hosts: Option<HashSet<String>> = config
        .crawler
        .hosts
        .as_ref()
        .map(|hosts| hosts.iter().cloned().collect());

    let downloader = Arc::new(
        HttpDownloader::new(&config.user_agent).context("Failed to build HTTP client")?,
    );
    let crawler = Crawler::from_config(downloader, &config.crawler)?;

    tracing::info!(
        "Crawling {} to depth {} ({} downloaders, {} extractors, {} per host)",
        cli.url,
        depth,
        config.crawler.downloaders,
        config.crawler.extractors,
        config.crawler.per_host
    );

    let start_time = Instant::now();
    let outcome = crawler.crawl_with_hosts(&cli.url, depth, hosts).await;
    crawler.shutdown().await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_result(&result, start_time.elapsed()));
        println!();
        print_result(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }
    if let Some(downloaders) = cli.downloaders {
        config.crawler.downloaders = downloaders;
    }
    if let Some(extractors) = cli.extractors {
        config.crawler.extractors = extractors;
    }
    if let Some(per_host) = cli.per_host {
        config.crawler.per_host = per_host;
    }
    if !cli.hosts.is_empty() {
        config.crawler.hosts = Some(cli.hosts.clone());
    }

    validate(&config)?;
    Ok(config)
}

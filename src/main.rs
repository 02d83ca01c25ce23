//! Sitemap-Scout main entry point
//!
//! This is the command-line interface for sitemap discovery and crawl
//! reconciliation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use sitemap_scout::config::{load_config_with_hash, validate, validate_base_url, Config, OnMissing};
use sitemap_scout::discovery::{DecisionProvider, FixedDecision, Orchestrator, PromptDecision};
use sitemap_scout::url::site_slug;
use tracing_subscriber::EnvFilter;

/// Sitemap-Scout: find every page of a website
///
/// Sitemap-Scout looks for the site's sitemap (robots.txt, conventional
/// paths, homepage links), flattens sitemap indexes, and falls back to a
/// polite breadth-first crawl when no usable sitemap exists.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scout")]
#[command(version)]
#[command(about = "Sitemap discovery and crawl reconciliation", long_about = None)]
struct Cli {
    /// Base URL of the website
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum link depth when crawling
    #[arg(long)]
    crawl_depth: Option<u32>,

    /// Maximum number of pages recorded by a crawl
    #[arg(long)]
    max_crawl_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Pause between crawled pages in milliseconds
    #[arg(long)]
    delay: Option<u64>,

    /// Also crawl when a sitemap is found and merge the results
    #[arg(long)]
    augment: bool,

    /// Where to save the sitemap (default: <site>_sitemap.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do when no usable sitemap is found
    #[arg(long, value_enum)]
    on_missing: Option<MissingAction>,

    /// Hand at most this many URLs downstream
    #[arg(long)]
    limit: Option<usize>,

    /// Print every discovered URL
    #[arg(long)]
    list: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissingAction {
    Prompt,
    Crawl,
    Cancel,
}

impl From<MissingAction> for OnMissing {
    fn from(action: MissingAction) -> Self {
        match action {
            MissingAction::Prompt => OnMissing::Prompt,
            MissingAction::Crawl => OnMissing::Crawl,
            MissingAction::Cancel => OnMissing::Cancel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let base = match validate_base_url(&cli.url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    tracing::info!(
        "Crawl limits: depth {}, {} pages, {}ms delay",
        config.crawler.max_depth,
        config.crawler.max_pages,
        config.crawler.delay_ms
    );

    let decider: Box<dyn DecisionProvider> =
        match FixedDecision::from_on_missing(config.discovery.on_missing) {
            Some(fixed) => Box::new(fixed),
            None => Box::new(PromptDecision),
        };

    let orchestrator = Orchestrator::new(config)?;
    let result = match orchestrator.discover(&base, decider.as_ref()).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Discovery failed: {}", e);
            return Err(e.into());
        }
    };

    if cli.list {
        for url in result.urls() {
            println!("{}", url);
        }
    }

    let source = result
        .sitemap_url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| format!("crawl of {}", base));
    println!(
        "✓ {} URLs ({}) from {}",
        result.len(),
        result.provenance,
        source
    );
    println!("✓ Sitemap saved to: {}", result.sitemap_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scout=info,warn"),
            1 => EnvFilter::new("sitemap_scout=debug,info"),
            2 => EnvFilter::new("sitemap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let mut config = Config::default();
            config.discovery.output = PathBuf::from(format!("{}_sitemap.xml", site_slug(&cli.url)));
            config
        }
    };

    if let Some(depth) = cli.crawl_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(pages) = cli.max_crawl_pages {
        config.crawler.max_pages = pages;
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_ms = delay;
    }
    if cli.augment {
        config.discovery.augment = true;
    }
    if let Some(output) = &cli.output {
        config.discovery.output = output.clone();
    }
    if let Some(action) = cli.on_missing {
        config.discovery.on_missing = action.into();
    }
    if cli.limit.is_some() {
        config.discovery.limit = cli.limit;
    }

    validate(&config)?;
    Ok(config)
}

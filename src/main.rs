//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest crawler and
//! knowledge-file generator.

use anyhow::Context;
use clap::Parser;
use site_harvest::config::{load_settings_with_hash, validate, CrawlBudget, Settings};
use site_harvest::crawler::{crawl, CrawlReport};
use site_harvest::output::{KnowledgeFileGenerator, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a polite single-site crawler
///
/// Site-Harvest crawls a website outward from a seed URL, staying on the
/// seed's host and respecting robots.txt, then writes the collected text as
/// plain-text and markdown knowledge files.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-site crawler for knowledge files", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(long)]
    url: String,

    /// Crawl depth (1-10)
    #[arg(long, value_name = "N")]
    depth: u32,

    /// Maximum number of pages to collect (1-1000)
    #[arg(long, value_name = "N")]
    max_pages: usize,

    /// Output format: txt, md or all
    #[arg(long, default_value = "all")]
    output_format: OutputFormat,

    /// Directory knowledge files are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Path to TOML settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds to wait between batches (overrides the settings file)
    #[arg(long)]
    delay: Option<f64>,

    /// Concurrent requests per batch (overrides the settings file)
    #[arg(long)]
    concurrent: Option<usize>,

    /// Maximum size of one output file in MB (overrides the settings file)
    #[arg(long, value_name = "MB")]
    max_file_size: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = load_settings(&cli)?;
    let budget = build_budget(&cli, &settings)?;

    let report = handle_crawl(budget).await?;
    if report.pages.is_empty() {
        tracing::error!("No pages could be collected from {}", cli.url);
        std::process::exit(1);
    }

    handle_output(&cli, &settings, &report)?;

    tracing::info!("Done");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
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

/// Loads the settings file if one was given, applying CLI overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            let (settings, hash) = load_settings_with_hash(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            tracing::info!("Settings loaded successfully (hash: {})", hash);
            settings
        }
        None => Settings::default(),
    };

    if let Some(mb) = cli.max_file_size {
        settings.output.max_file_size_mb = mb;
    }

    validate(&settings).context("invalid settings")?;
    Ok(settings)
}

/// Assembles and validates the crawl budget
fn build_budget(cli: &Cli, settings: &Settings) -> anyhow::Result<CrawlBudget> {
    let mut budget = CrawlBudget::from_settings(&cli.url, cli.depth, cli.max_pages, settings);

    if let Some(delay) = cli.delay {
        budget = budget.with_delay_secs(delay)?;
    }
    if let Some(concurrent) = cli.concurrent {
        budget = budget.with_concurrency(concurrent);
    }

    budget.validate().context("invalid crawl parameters")?;
    Ok(budget)
}

/// Handles the crawl itself
async fn handle_crawl(budget: CrawlBudget) -> anyhow::Result<CrawlReport> {
    tracing::info!("Target URL: {}", budget.seed_url);
    tracing::info!(
        "Depth: {}, max pages: {}, concurrency: {}, delay: {:?}",
        budget.max_depth,
        budget.max_pages,
        budget.concurrency,
        budget.politeness_delay
    );
    if !budget.respect_robots {
        tracing::warn!("robots.txt enforcement is disabled");
    }

    let report = crawl(budget).await.context("crawl failed")?;
    tracing::info!("Crawl finished: {} pages collected", report.pages.len());
    Ok(report)
}

/// Writes the knowledge files for a finished crawl
fn handle_output(cli: &Cli, settings: &Settings, report: &CrawlReport) -> anyhow::Result<()> {
    let generator = KnowledgeFileGenerator::new(
        &cli.output_dir,
        settings.output.clone(),
        cli.output_format,
        settings.parsing.min_text_length,
    );

    let files = generator
        .generate(&report.pages, &cli.url)
        .with_context(|| format!("failed to write files to {}", cli.output_dir.display()))?;

    if files.is_empty() {
        tracing::warn!(
            "No page had at least {} characters of text; nothing written",
            settings.parsing.min_text_length
        );
    }
    for file in &files {
        tracing::info!("  - {}", file.display());
    }

    Ok(())
}

//! Rent-Scout main entry point
//!
//! This is the command-line interface for the Rent-Scout listing crawler.

use clap::Parser;
use rent_scout::config::{load_config_with_hash, Config};
use rent_scout::crawler::crawl;
use rent_scout::output::{print_statistics, CrawlStatistics};
use rent_scout::split_sections;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rent-Scout: a concurrent rental listing crawler
///
/// Rent-Scout splits a search into one partition per section code, crawls
/// every result page of each partition concurrently, optionally visits each
/// listing's detail page, and exports the results as JSON and a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "rent-scout")]
#[command(version)]
#[command(about = "A concurrent rental listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the partition URLs without crawling
    #[arg(long)]
    dry_run: bool,

    /// Skip fetching detail pages
    #[arg(long)]
    no_details: bool,

    /// Override the region code from the config
    #[arg(long)]
    region: Option<u32>,

    /// Override the section codes from the config (comma-separated)
    #[arg(long)]
    section: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rent_scout=info,warn"),
            1 => EnvFilter::new("rent_scout=debug,info"),
            2 => EnvFilter::new("rent_scout=trace,debug"),
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

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(region) = cli.region {
        config.query.region = region;
    }
    if let Some(section) = &cli.section {
        config.query.section = section.clone();
    }
    if cli.no_details {
        config.crawler.enrich_details = false;
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Rent-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    match config.crawler.max_concurrent_pages {
        0 => println!("  Max concurrent pages: unbounded"),
        limit => println!("  Max concurrent pages: {}", limit),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Transport policy: {:?}", config.crawler.transport_policy);
    println!("  Page order: {:?}", config.crawler.page_order());
    println!(
        "  Detail pages: {}",
        if config.crawler.enrich_details {
            format!("yes ({} at a time)", config.crawler.enrich_concurrency)
        } else {
            "no".to_string()
        }
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_file().display());
    println!("  Spreadsheet: {}", config.output.spreadsheet_file().display());
    if let Some(areas) = &config.output.areas_path {
        println!("  Area list: {}", areas);
    }

    let partitions = split_sections(&config.query);
    println!("\nPartitions ({}), region {}:", partitions.len(), config.query.region);
    for partition in &partitions {
        println!("  - {}", partition.url()?);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Region: {}, Sections: {}",
        config.query.region,
        if config.query.section.is_empty() { "all" } else { config.query.section.as_str() }
    );

    // Run the crawler
    match crawl(&config).await {
        Ok(records) => {
            print_statistics(&CrawlStatistics::from_records(&records));
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

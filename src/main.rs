//! Aqua-Harvest main entry point
//!
//! This is the command-line interface for the Aqua-Harvest care-sheet
//! harvester and its dataset post-processing stages.

use anyhow::Context;
use aqua_harvest::config::{load_config_with_hash, Config};
use aqua_harvest::crawler::Coordinator;
use aqua_harvest::output::{print_dataset_summary, print_statistics, RunStatus};
use aqua_harvest::postprocess;
use aqua_harvest::storage::{build_category_index, read_collection, SqliteExporter};
use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Aqua-Harvest: a polite care-sheet harvester
///
/// Aqua-Harvest walks an aquarium livestock catalog category by category,
/// extracts one species care-sheet per product page, translates the free
/// text while keeping species names intact, and saves a resumable dataset.
/// Rerunning after an interruption only fetches products not yet saved.
#[derive(Parser, Debug)]
#[command(name = "aqua-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite care-sheet harvester", long_about = None)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
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

    /// Validate config and show what would be harvested
    #[arg(long, group = "mode")]
    dry_run: bool,

    /// Show per-category counts of the saved dataset and exit
    #[arg(long, group = "mode")]
    stats: bool,

    /// Convert sizes, tank volumes and temperatures to metric units
    #[arg(long, group = "mode")]
    convert_units: bool,

    /// Strip shop boilerplate from saved descriptions
    #[arg(long, group = "mode")]
    clean_descriptions: bool,

    /// Download product images and point records at the local copies
    #[arg(long, group = "mode")]
    download_images: bool,

    /// Copy the dataset and images into the publish directory
    #[arg(long, group = "mode")]
    publish: bool,

    /// Export the dataset into the SQLite database
    #[arg(long, group = "mode")]
    export_sqlite: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.convert_units {
        let changed = postprocess::convert_units(&config).context("unit conversion failed")?;
        println!("✓ Converted units in {} records", changed);
    } else if cli.clean_descriptions {
        let changed =
            postprocess::clean_descriptions(&config).context("description cleaning failed")?;
        println!("✓ Cleaned {} descriptions", changed);
    } else if cli.download_images {
        let stats = postprocess::retrieve_images(&config)
            .await
            .context("image download failed")?;
        println!(
            "✓ Images: {} downloaded, {} skipped, {} failed",
            stats.downloaded, stats.skipped, stats.failed
        );
    } else if cli.publish {
        let summary = postprocess::publish(&config).context("publishing failed")?;
        println!(
            "✓ Published {} data files and {} images to {}",
            summary.collections, summary.images_copied, config.postprocess.publish_dir
        );
    } else if cli.export_sqlite {
        handle_export_sqlite(&config)?;
    } else {
        return handle_harvest(config, config_hash).await;
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("aqua_harvest=info,warn"),
            1 => EnvFilter::new("aqua_harvest=debug,info"),
            2 => EnvFilter::new("aqua_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config) {
    println!("=== Aqua-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Retry backoff: {}ms", config.crawler.retry_backoff_ms);
    println!("  Max listing pages: {}", config.crawler.max_listing_pages);
    println!("  Page size: {}", config.crawler.page_size);

    println!("\nRate Limits:");
    println!(
        "  Between products: {}-{}ms",
        config.rate_limit.product_delay_min_ms, config.rate_limit.product_delay_max_ms
    );
    println!(
        "  After translations: {}-{}ms",
        config.rate_limit.translation_delay_min_ms, config.rate_limit.translation_delay_max_ms
    );

    println!("\nSite: {}", config.site.base_url);
    println!("  User agent: {}", config.identity.user_agent);

    println!("\nTranslation:");
    println!("  Endpoint: {}", config.translation.endpoint);
    println!(
        "  Languages: {} -> {}",
        config.translation.source_language, config.translation.target_language
    );

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Category index: {}", config.output.index_path().display());
    println!("  Run report: {}", config.output.report_path);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!(
            "  - {} / {} [{}] {}",
            category.name, category.name_tr, category.slug, category.url
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows counts from the saved collections
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Data directory: {}\n", config.output.data_dir);

    let index = build_category_index(config.output.data_dir(), &config.categories);
    print_dataset_summary(&index);

    Ok(())
}

/// Handles the --export-sqlite mode
fn handle_export_sqlite(config: &Config) -> anyhow::Result<()> {
    let db_path = Path::new(&config.output.sqlite_path);
    let mut exporter = SqliteExporter::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    for category in &config.categories {
        let path = config.output.data_dir().join(category.collection_file());
        let records = read_collection(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let summary = exporter.export(&records, &category.slug)?;
        println!(
            "  {}: {} inserted, {} already present",
            category.slug, summary.inserted, summary.skipped
        );
    }

    println!("\n✓ Database now holds {} species", exporter.count()?);
    Ok(())
}

/// Handles the main harvest operation
///
/// Ctrl-C requests a stop; the current subcategory is saved before exit.
async fn handle_harvest(config: Config, config_hash: String) -> anyhow::Result<ExitCode> {
    tracing::info!(
        "Harvesting {} categories from {}",
        config.categories.len(),
        config.site.base_url
    );

    let mut coordinator = Coordinator::new(config)?.with_config_hash(config_hash);

    let interrupt = coordinator.interrupt_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, saving progress...");
            interrupt.trigger();
        }
    });

    let stats = match coordinator.run().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    print_statistics(&stats);

    if stats.status == RunStatus::Interrupted {
        println!("Harvest interrupted; run again to resume.");
        return Ok(ExitCode::from(130));
    }

    Ok(ExitCode::SUCCESS)
}

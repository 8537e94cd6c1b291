//! Shelfcrawl main entry point
//!
//! This is the command-line interface for the Yes24 and Kyobo book crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shelfcrawl::config::{load_config_with_hash, Config};
use shelfcrawl::output::write_csv;
use shelfcrawl::sites::{site_for, ListingQuery, SiteKind};
use shelfcrawl::{CategoryLoader, Fetcher, Pipeline, PipelineResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelfcrawl: a bookstore listing, review and detail crawler
///
/// Shelfcrawl searches Yes24 and Kyobo, walks the paginated listings, and
/// collects reviews or book details for every listed title. Results are
/// exported as CSV.
#[derive(Parser, Debug)]
#[command(name = "shelfcrawl")]
#[command(version)]
#[command(about = "Bookstore listing, review and detail crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a store and collect reviews of every listed book
    Reviews {
        /// Store to search (yes24 or kyobo)
        site: SiteKind,

        /// Search keyword
        keyword: String,

        /// Maximum number of books
        #[arg(long, default_value_t = 20)]
        max_items: usize,

        /// Maximum number of reviews per book
        #[arg(long, default_value_t = 50)]
        max_reviews: usize,

        /// Sort order token (store default when omitted)
        #[arg(long)]
        order: Option<String>,
    },

    /// Search a store and extract the detail page of every listed book
    Details {
        /// Store to search (only yes24 has detail pages)
        site: SiteKind,

        /// Search keyword
        keyword: String,

        /// Maximum number of books
        #[arg(long, default_value_t = 20)]
        max_items: usize,

        /// Sort order token (store default when omitted)
        #[arg(long)]
        order: Option<String>,
    },

    /// Extract details of new arrivals in a Yes24 category
    NewBooks {
        /// Category number, e.g. 001001003
        category_id: String,

        /// Use the featured new arrivals listing
        #[arg(long)]
        featured: bool,

        /// Maximum number of books
        #[arg(long, default_value_t = 20)]
        max_items: usize,
    },

    /// Print the Yes24 category tree
    Categories {
        /// Root category number
        #[arg(long, default_value = "001")]
        root: String,

        /// Rebuild the tree without reading or writing the cache
        #[arg(long)]
        no_cache: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let fetcher = Fetcher::new(&config)?;
    let results_dir = PathBuf::from(&config.output.results_dir);

    match cli.command {
        Command::Reviews {
            site,
            keyword,
            max_items,
            max_reviews,
            order,
        } => {
            let store = site_for(site, &config);
            let pipeline = Pipeline::new(&fetcher, store.as_ref(), &config.crawler);
            let query = ListingQuery::Keyword {
                text: keyword.clone(),
                order,
            };

            tracing::info!("Collecting {} reviews for '{}'", site, keyword);
            let result = pipeline
                .search_reviews(&query, max_items, max_reviews, &mut print_progress)
                .await;
            export(&result, &results_dir, &format!("{}_reviews_{}", site, keyword))?;
        }
        Command::Details {
            site,
            keyword,
            max_items,
            order,
        } => {
            let store = site_for(site, &config);
            let pipeline = Pipeline::new(&fetcher, store.as_ref(), &config.crawler);
            let query = ListingQuery::Keyword {
                text: keyword.clone(),
                order,
            };

            tracing::info!("Extracting {} book details for '{}'", site, keyword);
            let result = pipeline
                .search_details(&query, max_items, &mut print_progress)
                .await;
            export(&result, &results_dir, &format!("{}_details_{}", site, keyword))?;
        }
        Command::NewBooks {
            category_id,
            featured,
            max_items,
        } => {
            let store = site_for(SiteKind::Yes24, &config);
            let loader = CategoryLoader::new(
                &fetcher,
                store.as_ref(),
                &config.output.category_cache_path,
            );
            let category_name = match loader.load(root_of(&category_id), true).await {
                Ok(tree) => tree
                    .get(&category_id)
                    .map(|node| node.name.clone())
                    .unwrap_or_else(|| category_id.clone()),
                Err(e) => {
                    tracing::warn!("Category names unavailable: {}", e);
                    category_id.clone()
                }
            };

            let pipeline = Pipeline::new(&fetcher, store.as_ref(), &config.crawler);
            tracing::info!("Extracting new arrivals in {} ({})", category_name, category_id);
            let result = if featured {
                pipeline
                    .featured_category_details(
                        &category_id,
                        &category_name,
                        max_items,
                        &mut print_progress,
                    )
                    .await
            } else {
                pipeline
                    .category_details(&category_id, &category_name, max_items, &mut print_progress)
                    .await
            };
            export(
                &result,
                &results_dir,
                &format!("yes24_new_{}", category_name),
            )?;
        }
        Command::Categories { root, no_cache } => {
            let store = site_for(SiteKind::Yes24, &config);
            let loader = CategoryLoader::new(
                &fetcher,
                store.as_ref(),
                &config.output.category_cache_path,
            );
            let tree = loader.load(&root, !no_cache).await?;
            for line in tree.render() {
                println!("{}", line);
            }
            println!("\n{} categories", tree.len());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfcrawl=info,warn"),
            1 => EnvFilter::new("shelfcrawl=debug,info"),
            2 => EnvFilter::new("shelfcrawl=trace,debug"),
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

fn print_progress(current: usize, total: usize, message: &str) {
    println!("[{}/{}] {}", current, total, message);
}

/// First segment of a category number
fn root_of(category_id: &str) -> &str {
    category_id
        .get(..shelfcrawl::category::SEGMENT_WIDTH)
        .unwrap_or(category_id)
}

/// Writes the collected data and the per-item summary as CSV
fn export<T: Serialize>(
    result: &PipelineResult<T>,
    results_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    if !result.is_success() {
        bail!("{}", result.message);
    }

    println!("\n✓ {}", result.message);
    let failed = result.summary.iter().filter(|s| s.is_failure()).count();
    if failed > 0 {
        println!("  {} of {} books failed", failed, result.summary.len());
    }

    if result.data.is_empty() {
        println!("  Nothing to export");
        return Ok(());
    }

    let data_path = write_csv(&result.data, results_dir, name)?;
    println!("✓ Data exported to: {}", data_path.display());

    let summary_path = write_csv(&result.summary, results_dir, &format!("{}_summary", name))?;
    println!("✓ Summary exported to: {}", summary_path.display());

    Ok(())
}

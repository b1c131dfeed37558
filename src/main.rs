//! WA Law Scraper main entry point
//!
//! This is the command-line interface for generating registries of the
//! Washington State legal codes and scraping their content.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wa_law_scraper::config::{load_config_with_hash, Config};
use wa_law_scraper::crawler::{ContentScraper, Crawler, PageFetcher, RegistryGenerator};
use wa_law_scraper::output::{format_listing_line, print_content_stats, print_registry_info};
use wa_law_scraper::{CodeType, ContentStore, RegistryStore};

/// WA Law Scraper: registry system for Washington State legal codes
#[derive(Parser, Debug)]
#[command(name = "wa-law-scraper")]
#[command(version)]
#[command(about = "Registry system for Washington State legal codes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for registries and content (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

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
    /// Crawl the index pages and save a new registry
    Generate {
        #[arg(value_enum)]
        code_type: CodeSelection,

        /// Sleep a fixed delay before every request
        #[arg(long)]
        rate_limit: bool,
    },

    /// List existing registries, newest first
    List {
        #[arg(long, value_enum)]
        code_type: Option<CodeArg>,
    },

    /// Show information about a registry
    Info {
        /// Show the latest registry of this type
        #[arg(long, value_enum, conflicts_with = "file", required_unless_present = "file")]
        code_type: Option<CodeArg>,

        /// Specific registry file
        #[arg(long)]
        file: Option<PathBuf>,

        /// List every title
        #[arg(long)]
        titles: bool,
    },

    /// Fetch the content of every node in the latest registry
    ScrapeContent {
        #[arg(value_enum)]
        code_type: CodeSelection,

        /// Sleep a fixed delay before every request
        #[arg(long)]
        rate_limit: bool,

        /// Re-fetch content that is already stored
        #[arg(long)]
        force: bool,

        /// Only scrape these title numbers
        #[arg(long = "title", value_name = "NUMBER")]
        titles: Vec<String>,
    },

    /// Show statistics for stored content
    ContentInfo {
        #[arg(long, value_enum)]
        code_type: Option<CodeArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CodeArg {
    Wac,
    Rcw,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CodeSelection {
    Wac,
    Rcw,
    Both,
}

impl From<CodeArg> for CodeType {
    fn from(arg: CodeArg) -> Self {
        match arg {
            CodeArg::Wac => CodeType::Wac,
            CodeArg::Rcw => CodeType::Rcw,
        }
    }
}

impl CodeSelection {
    fn code_types(self) -> Vec<CodeType> {
        match self {
            Self::Wac => vec![CodeType::Wac],
            Self::Rcw => vec![CodeType::Rcw],
            Self::Both => CodeType::all().to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wa_law_scraper=info,warn"),
            1 => EnvFilter::new("wa_law_scraper=debug,info"),
            2 => EnvFilter::new("wa_law_scraper=trace,debug"),
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

/// Runs the selected command. Ok(false) means some sub-unit failed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
            config
        }
        None => Config::default(),
    };

    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    match cli.command {
        Command::Generate {
            code_type,
            rate_limit,
        } => {
            config.fetcher.rate_limit |= rate_limit;
            handle_generate(&config, code_type).await
        }
        Command::List { code_type } => handle_list(&config, code_type.map(Into::into)),
        Command::Info {
            code_type,
            file,
            titles,
        } => handle_info(&config, code_type.map(Into::into), file, titles),
        Command::ScrapeContent {
            code_type,
            rate_limit,
            force,
            titles,
        } => {
            config.fetcher.rate_limit |= rate_limit;
            handle_scrape_content(&config, code_type, !force, &titles).await
        }
        Command::ContentInfo { code_type } => {
            let store = ContentStore::new(
                &config.storage.data_dir,
                &config.storage.content_extension,
            )?;
            print_content_stats(&store.stats(), code_type.map(Into::into));
            Ok(true)
        }
    }
}

async fn handle_generate(config: &Config, selection: CodeSelection) -> anyhow::Result<bool> {
    let store = RegistryStore::new(&config.storage.data_dir)?;
    let fetcher = PageFetcher::from_config(&config.fetcher)?;
    let generator = RegistryGenerator::new(Crawler::new(fetcher), store, config.sources.clone());

    let code_types = selection.code_types();
    let mut succeeded = 0;

    for code_type in &code_types {
        match generator.generate(*code_type).await {
            Ok(report) => {
                succeeded += 1;
                println!(
                    "{} registry generated successfully with {} titles",
                    code_type,
                    report.registry.titles.len()
                );
                if !report.gaps.is_empty() {
                    println!("  {} pages could not be fetched", report.gaps.len());
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                println!("Failed to generate {} registry", code_type);
            }
        }
    }

    println!("{}/{} registries generated", succeeded, code_types.len());
    Ok(succeeded == code_types.len())
}

fn handle_list(config: &Config, code_type: Option<CodeType>) -> anyhow::Result<bool> {
    let store = RegistryStore::new(&config.storage.data_dir)?;
    let registries = store.list(code_type)?;

    if registries.is_empty() {
        let filter_msg = code_type
            .map(|c| format!(" for {}", c))
            .unwrap_or_default();
        println!("No registries found{}", filter_msg);
        return Ok(true);
    }

    println!("Found {} registries:", registries.len());
    for path in &registries {
        let modified = std::fs::metadata(path)?.modified()?;
        println!("{}", format_listing_line(path, modified));
    }

    Ok(true)
}

fn handle_info(
    config: &Config,
    code_type: Option<CodeType>,
    file: Option<PathBuf>,
    list_titles: bool,
) -> anyhow::Result<bool> {
    let store = RegistryStore::new(&config.storage.data_dir)?;

    let path = match (file, code_type) {
        (Some(file), _) => {
            if !file.exists() {
                println!("Registry file not found: {}", file.display());
                return Ok(false);
            }
            file
        }
        (None, Some(code_type)) => match store.list(Some(code_type))?.into_iter().next() {
            Some(path) => path,
            None => {
                println!("No registries found for {}", code_type);
                return Ok(false);
            }
        },
        (None, None) => anyhow::bail!("either --code-type or --file is required"),
    };

    match store.load(&path) {
        Some(registry) => {
            print_registry_info(&path, &registry, list_titles);
            Ok(true)
        }
        None => {
            println!("Failed to load registry from: {}", path.display());
            Ok(false)
        }
    }
}

async fn handle_scrape_content(
    config: &Config,
    selection: CodeSelection,
    skip_existing: bool,
    titles: &[String],
) -> anyhow::Result<bool> {
    let registries = RegistryStore::new(&config.storage.data_dir)?;
    let content = ContentStore::new(
        &config.storage.data_dir,
        &config.storage.content_extension,
    )?;
    let fetcher = PageFetcher::from_config(&config.fetcher)?;
    let scraper = ContentScraper::new(fetcher, content);

    let mut all_succeeded = true;

    for code_type in selection.code_types() {
        match scraper
            .scrape_latest(&registries, code_type, skip_existing, titles)
            .await
        {
            Ok(summary) => {
                println!(
                    "{}: {}/{} titles scraped successfully ({} fetched, {} skipped, {} failed)",
                    code_type,
                    summary.titles_succeeded,
                    summary.titles_total,
                    summary.fetched,
                    summary.skipped,
                    summary.failed.len()
                );
                all_succeeded &= summary.is_success();
            }
            Err(e) => {
                tracing::error!("{}", e);
                println!("Failed to scrape {} content", code_type);
                all_succeeded = false;
            }
        }
    }

    Ok(all_succeeded)
}

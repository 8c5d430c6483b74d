//! FestivalRadar - local event finder
//!
//! Queries Ticketmaster and Eventbrite, normalizes their listings into one
//! record shape and serves the merged result over HTTP, both as a plain
//! search endpoint and as an MCP tool for orchestrating agents.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, bind failure, etc.)

mod agent;
mod cli;
mod config;
mod error;
mod models;
mod providers;
mod report;
mod search;
mod server;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::SearchRequest;
use search::EventAggregator;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config and --prompt early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }
    if args.prompt {
        println!(
            "{}",
            search::event_search_prompt(
                args.city.as_deref(),
                args.genre.as_deref(),
                args.start_date.as_deref(),
                args.end_date.as_deref(),
            )
        );
        return Ok(());
    }

    init_logging(&args)?;

    info!("FestivalRadar v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("FestivalRadar failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .festivalradar.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   API keys are read from TICKETMASTER_API_KEY and EVENTBRITE_API_KEY.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` takes precedence.
fn init_logging(args: &Args) -> Result<()> {
    let level = args.log_level().as_str().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("festivalradar={},tower_http={}", level, level))
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Load configuration, then either serve or run a single search.
async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let aggregator =
        EventAggregator::new(&config).context("Failed to initialize provider clients")?;

    if args.is_one_shot() {
        return run_search(&args, &aggregator).await;
    }

    println!("🎶 FestivalRadar listening on http://{}", config.bind_address());
    server::serve(&config.bind_address(), server::AppState::new(aggregator)).await
}

/// Run one search and print or save the report.
async fn run_search(args: &Args, aggregator: &EventAggregator) -> Result<()> {
    let start_time = Instant::now();

    let request = SearchRequest::new(
        args.city.clone().unwrap_or_default(),
        args.genre.clone(),
        args.start_date.clone(),
        args.end_date.clone(),
    );
    let response = aggregator.search(&request).await;

    let metadata = report::ReportMetadata {
        generated_at: Utc::now(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&response)?,
        OutputFormat::Markdown => report::generate_markdown_report(&response, &metadata),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => println!("{}", output),
    }

    for failure in response.errors() {
        warn!("{} unavailable: {}", failure.source, failure.error);
    }

    Ok(())
}

/// Build the effective configuration: file, then environment, then CLI flags.
fn load_config(args: &Args) -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let mut config = match args.config {
        Some(ref config_path) => {
            info!("Loading config from: {}", config_path.display());
            Config::load(config_path)?
        }
        None => match Config::load_default() {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Config::default()
            }
        },
    };

    config.merge_with_env(|key| std::env::var(key).ok())?;
    config.merge_with_args(args);

    Ok(config)
}

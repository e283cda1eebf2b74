//! CLI administration tool for weighted-shortener.
//!
//! Inspects and creates short links directly against the configured store,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a record's targets and their selection probabilities
//! cargo run --bin admin -- lookup aZ3k9
//!
//! # Create a short link with two weighted targets
//! cargo run --bin admin -- create --url https://a.example.com=3 --url https://b.example.com=1
//!
//! # Simulate 10000 redirects for a code
//! cargo run --bin admin -- pick aZ3k9 --draws 10000
//!
//! # Check store connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see [`weighted_shortener::config`]); `DATABASE_URL`
//! is required for the default postgres backend.

use weighted_shortener::config::{self, Config};
use weighted_shortener::domain::entities::Record;
use weighted_shortener::domain::repositories::RecordStore;
use weighted_shortener::domain::selection::pick_url;
use weighted_shortener::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::{Number, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// CLI tool for managing weighted-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the targets stored under a short code
    Lookup {
        /// Short code to look up
        short_code: String,
    },

    /// Create a short link
    Create {
        /// Target as URL=WEIGHT (repeatable)
        #[arg(short, long = "url", value_name = "URL=WEIGHT", required = true)]
        urls: Vec<String>,
    },

    /// Simulate weighted redirects for a short code
    Pick {
        /// Short code to draw from
        short_code: String,

        /// Number of draws
        #[arg(short = 'n', long, default_value_t = 1000)]
        draws: u32,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let store = server::connect_store(&config).await?;

    match cli.command {
        Commands::Lookup { short_code } => lookup(store, &short_code).await?,
        Commands::Create { urls } => create(&config, store, &urls).await?,
        Commands::Pick { short_code, draws } => pick(store, &short_code, draws).await?,
        Commands::Db { action } => handle_db_action(action, store).await?,
    }

    Ok(())
}

/// Fetches a record or fails with a readable message.
async fn fetch_record(store: &dyn RecordStore, short_code: &str) -> Result<Record> {
    store
        .get(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
        .with_context(|| format!("Short code '{}' not found", short_code))
}

/// Prints each target with its weight and share of traffic.
async fn lookup(store: Arc<dyn RecordStore>, short_code: &str) -> Result<()> {
    let record = fetch_record(store.as_ref(), short_code).await?;
    let weighted = record
        .weighted_urls()
        .map_err(|e| anyhow::anyhow!("Record cannot be sampled: {}", e))?;
    let total: f64 = weighted.iter().map(|w| w.weight).sum();

    println!("{} {}", "Short code:".bright_blue().bold(), record.short_code.cyan());
    println!();

    for (target, w) in record.targets.iter().zip(&weighted) {
        let share = if total > 0.0 { w.weight / total * 100.0 } else { 0.0 };
        println!(
            "  {:>6.2}%  {}  {}",
            share,
            format!("weight={}", w.weight).bright_black(),
            target.url.bright_white()
        );
    }
    println!();

    Ok(())
}

/// Splits `URL=WEIGHT` at the last `=`, so URLs with query strings survive.
fn parse_url_arg(arg: &str) -> Result<(String, Number)> {
    let (url, weight) = arg
        .rsplit_once('=')
        .with_context(|| format!("Expected URL=WEIGHT, got '{}'", arg))?;

    let weight: Number = serde_json::from_str(weight.trim())
        .with_context(|| format!("Weight in '{}' is not a number", arg))?;

    Ok((url.to_string(), weight))
}

/// Builds a shorten request body from `URL=WEIGHT` arguments.
fn build_body(args: &[String]) -> Result<Value> {
    let urls = args
        .iter()
        .map(|arg| {
            let (url, weight) = parse_url_arg(arg)?;
            Ok(json!({ "original_url": url, "weight": weight }))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({ "urls": urls }))
}

/// Allocates a short code through the same service the HTTP API uses.
async fn create(config: &Config, store: Arc<dyn RecordStore>, args: &[String]) -> Result<()> {
    let body = build_body(args)?;
    let service = server::build_allocation_service(config, store);

    let record = service
        .create_short_link(&body)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create short link: {}", e))?;

    println!("{}", "Short link created".green().bold());
    println!();
    println!("  Code: {}", record.short_code.cyan());
    println!("  URL:  {}", service.short_url(&record.short_code).bright_white());
    println!("  Targets: {}", record.targets.len());
    println!();

    Ok(())
}

/// Draws `draws` redirect targets and prints the observed distribution.
async fn pick(store: Arc<dyn RecordStore>, short_code: &str, draws: u32) -> Result<()> {
    let record = fetch_record(store.as_ref(), short_code).await?;
    let weighted = record
        .weighted_urls()
        .map_err(|e| anyhow::anyhow!("Record cannot be sampled: {}", e))?;

    let mut rng = rand::rng();
    let mut hits: BTreeMap<&str, u32> = BTreeMap::new();
    for _ in 0..draws {
        let url = pick_url(&weighted, &mut rng)
            .map_err(|e| anyhow::anyhow!("Selection failed: {}", e))?;
        *hits.entry(url).or_default() += 1;
    }

    println!(
        "{} {} draws for {}",
        "Simulated".bright_blue().bold(),
        draws,
        short_code.cyan()
    );
    println!();

    for w in &weighted {
        let count = hits.get(w.url.as_str()).copied().unwrap_or(0);
        let observed = if draws > 0 {
            f64::from(count) / f64::from(draws) * 100.0
        } else {
            0.0
        };
        println!(
            "  {:>8}  {:>6.2}%  {}",
            count.to_string().bright_green().bold(),
            observed,
            w.url.bright_white()
        );
    }
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_db_action(action: DbAction, store: Arc<dyn RecordStore>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking store connection...".bright_blue());

            if !store.health_check().await {
                anyhow::bail!("Store is unreachable");
            }

            println!("{}", "Store connection OK".green().bold());
        }
    }

    Ok(())
}

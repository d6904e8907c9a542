use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use wt_scraper::config::Config;
use wt_scraper::constants::DEFAULT_EVENTS_CSV;
use wt_scraper::events_input::{bulk_entry_path, EntryMode, Prompter};
use wt_scraper::infra::ReqwestHttp;
use wt_scraper::logging;
use wt_scraper::pipeline::{Pipeline, PipelineOptions};
use wt_scraper::storage::SqliteSink;
use wt_scraper::types::Event;

#[derive(Parser)]
#[command(name = "wt_scraper")]
#[command(about = "Flesh and Blood world tour coverage scraper")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to wt_scraper.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape pairings and decklists for each event into the database
    Run {
        /// Bulk events CSV; prompts for entry mode when omitted
        #[arg(long)]
        events: Option<PathBuf>,
        /// SQLite database to append to
        #[arg(long)]
        db: Option<PathBuf>,
        /// Skip rounds whose results page cannot be fetched
        #[arg(long)]
        continue_on_round_error: bool,
    },
    /// Print each event and the rounds that would be scraped, without fetching
    Plan {
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Write a table or view from the database to CSV
    Export {
        /// Table or view to read
        #[arg(long)]
        source: Option<String>,
        /// Output CSV path
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn load_events(path: Option<&Path>) -> anyhow::Result<Vec<Event>> {
    if let Some(path) = path {
        return Ok(bulk_entry_path(path)?);
    }
    let mut prompter = Prompter::stdio();
    let events = match prompter.entry_mode()? {
        EntryMode::Bulk => bulk_entry_path(Path::new(DEFAULT_EVENTS_CSV))
            .with_context(|| format!("reading {}", DEFAULT_EVENTS_CSV))?,
        EntryMode::Direct => prompter.events()?,
    };
    Ok(events)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(&config.logging.directory);

    match cli.command {
        Commands::Run {
            events,
            db,
            continue_on_round_error,
        } => {
            if let Some(db) = db {
                config.storage.database_path = db;
            }
            config.scraper.continue_on_round_error |= continue_on_round_error;

            let events = load_events(events.as_deref())?;
            if events.is_empty() {
                warn!("No events to scrape");
                return Ok(());
            }

            let http = ReqwestHttp::new(
                &config.scraper.user_agent,
                Duration::from_secs(config.scraper.timeout_seconds),
            )?;
            let sink = SqliteSink::new(&config.storage.database_path);
            let pipeline = Pipeline::new(
                Arc::new(http),
                Arc::new(sink),
                PipelineOptions {
                    base_url: config.scraper.base_url.clone(),
                    continue_on_round_error: config.scraper.continue_on_round_error,
                },
            );

            info!(
                "Scraping {} events into {}",
                events.len(),
                config.storage.database_path.display()
            );
            let report = pipeline.run(&events).await;

            println!("\n📊 Run results:");
            for summary in &report.completed {
                println!(
                    "   {}: {} rounds ({} skipped), {} participants, {} missing decklists, {} card lines",
                    summary.event,
                    summary.rounds_scraped.len(),
                    summary.rounds_skipped.len(),
                    summary.participants,
                    summary.missing_decklists,
                    summary.card_lines
                );
            }
            for (event, error) in &report.failed {
                println!("   ❌ {}: {}", event, error);
            }

            if !report.is_success() {
                bail!("{} of {} events failed", report.failed.len(), events.len());
            }
        }
        Commands::Plan { events } => {
            let events = load_events(events.as_deref())?;
            let plan: Vec<serde_json::Value> = events
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "event": e,
                        "constructed_rounds": e.constructed_rounds(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Export { source, out, db } => {
            if let Some(db) = db {
                config.storage.database_path = db;
            }
            let source = source.unwrap_or_else(|| config.storage.export_source.clone());
            let out = out.unwrap_or_else(|| config.storage.export_path());

            let sink = SqliteSink::new(&config.storage.database_path);
            let rows = sink.export_csv(&source, &out)?;
            println!("✅ Wrote {} rows to {}", rows, out.display());
        }
    }

    Ok(())
}

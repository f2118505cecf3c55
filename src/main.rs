//! # SCI Judgments
//!
//! Scrapes the Supreme Court of India "landmark judgment summaries" pages and
//! writes one JSON file of records per year.
//!
//! ## Usage
//!
//! ```sh
//! sci_judgments --from 2016 --to 2025 --out ./output --concurrency 4 --retries 2
//! ```
//!
//! ## Architecture
//!
//! 1. **Scheduling**: each requested year becomes a job, run sequentially or
//!    on a bounded worker pool with fixed-delay retries ([`scheduler`])
//! 2. **Fetching**: one GET per year; only `200 OK` is accepted
//!    ([`scrapers::sci`])
//! 3. **Extraction**: the judgments table is mapped to records despite layout
//!    differences between years ([`scrapers::table`])
//! 4. **Output**: `sci_judgments_<year>.json` in the output directory
//!    ([`outputs::json`])

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scheduler;
mod scrapers;
mod utils;

use cli::Cli;
use config::load_config;
use models::Outcome;
use scheduler::{run_jobs, RetryPolicy};
use scrapers::sci::SciScraper;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sci_judgments starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = load_config(args.config.as_deref())?;
    debug!(?config, "Using configuration");

    if let Err(e) = ensure_writable_dir(&args.out).await {
        error!(
            path = %args.out.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let years = args.years();
    if years.is_empty() {
        warn!(from = args.from, to = args.to, "No years to scrape");
        return Ok(());
    }

    let policy = RetryPolicy::new(args.retries, args.retry_delay());
    info!(
        years = ?years,
        out = %args.out.display(),
        concurrency = args.concurrency,
        retries = policy.retries,
        delay = ?policy.delay,
        "Starting scrape"
    );

    let scraper = Arc::new(SciScraper::new(config, args.out.clone())?);
    let results = run_jobs(scraper, &years, args.concurrency, policy).await;

    for result in &results {
        match &result.outcome {
            Outcome::Succeeded { records } => {
                info!(year = result.year, attempts = result.attempts, records, "Year succeeded")
            }
            Outcome::Abandoned { error } => {
                warn!(year = result.year, attempts = result.attempts, %error, "Year abandoned")
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape landmark judgment summaries into one JSON file per year.
///
/// # Examples
///
/// ```sh
/// # A single year
/// sci_judgments --year 2016
///
/// # A range with four workers, two retries five seconds apart
/// sci_judgments --from 2016 --to 2025 --concurrency 4 --retries 2 --retry-delay 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Single year to scrape (overrides --from/--to)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Start year to scrape (inclusive)
    #[arg(long, default_value_t = 2017)]
    pub from: u16,

    /// End year to scrape (inclusive)
    #[arg(long, default_value_t = 2018)]
    pub to: u16,

    /// Output directory for JSON files
    #[arg(short, long, env = "SCI_OUTPUT_DIR", default_value = "./output")]
    pub out: PathBuf,

    /// Number of concurrent workers; 1 runs years sequentially
    #[arg(short = 'j', long, default_value_t = 1)]
    pub concurrency: usize,

    /// Number of times to retry a failed year (concurrent mode)
    #[arg(short, long, default_value_t = 0)]
    pub retries: u32,

    /// Delay in seconds between retries
    #[arg(long, default_value_t = 2)]
    pub retry_delay: u64,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Years to scrape, in order. Empty when `--from` is after `--to`.
    pub fn years(&self) -> Vec<u16> {
        match self.year {
            Some(year) => vec![year],
            None => (self.from..=self.to).collect(),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }
}

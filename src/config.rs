//! Scraper configuration loaded from an optional YAML file.
//!
//! Every key is optional; missing keys take the values used against the live
//! site.
//!
//! ```yaml
//! url_template: "https://www.sci.gov.in/landmark-judgment-summaries/?judgment_year={year}"
//! table_selector: ".landmark_judgment_summary table"
//! min_year: 2016
//! max_year: 2025
//! user_agent: "sci_judgments/0.1"
//! ```

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.sci.gov.in/landmark-judgment-summaries/?judgment_year={year}";
pub const DEFAULT_TABLE_SELECTOR: &str = ".landmark_judgment_summary table";

/// Placeholder substituted with the year in [`ScraperConfig::url_template`].
const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    /// Page URL with a `{year}` placeholder.
    pub url_template: String,
    /// CSS selector for the landmark table; the first table is used if it
    /// matches nothing.
    pub table_selector: String,
    /// First year the site publishes.
    pub min_year: u16,
    /// Last year the site publishes.
    pub max_year: u16,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            min_year: 2016,
            max_year: 2025,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ScraperConfig {
    /// Page URL for `year`.
    pub fn page_url(&self, year: u16) -> String {
        self.url_template.replace(YEAR_PLACEHOLDER, &year.to_string())
    }

    pub fn supports_year(&self, year: u16) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

/// Load the configuration from `path`, or the defaults when no path is given.
#[instrument(level = "info")]
pub fn load_config(path: Option<&Path>) -> Result<ScraperConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(ScraperConfig::default());
    };
    let raw = std::fs::read_to_string(path)?;
    let config = parse_config(&raw)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<ScraperConfig, Box<dyn Error>> {
    let config: ScraperConfig = serde_yaml::from_str(raw)?;
    if !config.url_template.contains(YEAR_PLACEHOLDER) {
        return Err(format!("url_template must contain {YEAR_PLACEHOLDER}").into());
    }
    if config.min_year > config.max_year {
        return Err(format!(
            "min_year {} is after max_year {}",
            config.min_year, config.max_year
        )
        .into());
    }
    Ok(config)
}

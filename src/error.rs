//! Error type shared by the fetch, extraction and output stages.
//!
//! The scheduler does not distinguish between these kinds: any of them fails
//! the current attempt and is eligible for retry.

/// Errors that can occur while scraping a single year.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("fetch failed: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The page or a selector could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Neither the landmark table nor any other table exists on the page.
    #[error("no table found on page {url}")]
    TableNotFound { url: String },

    /// A table was found but yielded zero records.
    #[error("no judgments found on page {url}")]
    NoJudgments { url: String },

    /// The year is outside the window the site publishes.
    #[error("year {year} out of supported range {min}..{max}")]
    YearOutOfRange { year: u16, min: u16, max: u16 },

    /// The configured URL template produced an invalid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Creating the output directory or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the records failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

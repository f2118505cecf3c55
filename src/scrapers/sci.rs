//! Supreme Court of India landmark judgment summaries.
//!
//! One page per year, addressed by the `judgment_year` query parameter:
//! `https://www.sci.gov.in/landmark-judgment-summaries/?judgment_year=2016`.
//!
//! A year is processed in three steps, any of which fails the attempt:
//! fetch the page ([`fetch_page`]), extract the table rows
//! ([`parse_judgments`]), and write the year's JSON file.

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::Judgment;
use crate::outputs::json::write_judgments;
use crate::scheduler::YearRunner;
use crate::scrapers::table::parse_judgments;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use scraper::Selector;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info, instrument};
use url::Url;

/// Longest body excerpt kept in a [`ScrapeError::Status`].
const STATUS_BODY_PREVIEW: usize = 300;

/// A fetched page and the URL it was finally served from.
#[derive(Debug)]
pub struct FetchedPage {
    /// Base for resolving relative links (after redirects).
    pub base_url: Url,
    pub body: String,
}

/// Fetch a year's page.
///
/// Issues a single GET and accepts only `200 OK`.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Absolute page URL
///
/// # Returns
///
/// The body together with the final URL (after redirects), which is the base
/// for resolving relative links on the page.
///
/// # Errors
///
/// - [`ScrapeError::Http`] on transport failure or an unreadable body
/// - [`ScrapeError::Status`] for any other status, carrying a short body excerpt
#[instrument(level = "info", skip(client))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, ScrapeError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let base_url = response.url().clone();

    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(ScrapeError::Status {
            status,
            body: truncate_for_log(&body, STATUS_BODY_PREVIEW),
        });
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), %base_url, "Fetched page");
    Ok(FetchedPage { base_url, body })
}

/// Fetch, extract and write one year of judgments.
#[derive(Debug)]
pub struct SciScraper {
    client: Client,
    config: ScraperConfig,
    table_selector: Selector,
    out_dir: PathBuf,
}

impl SciScraper {
    /// Build a scraper with its own HTTP client.
    pub fn new(config: ScraperConfig, out_dir: PathBuf) -> Result<Self, ScrapeError> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Self::with_client(client, config, out_dir)
    }

    pub fn with_client(
        client: Client,
        config: ScraperConfig,
        out_dir: PathBuf,
    ) -> Result<Self, ScrapeError> {
        let table_selector = Selector::parse(&config.table_selector).map_err(|e| {
            ScrapeError::Parse(format!(
                "invalid table selector {:?}: {e}",
                config.table_selector
            ))
        })?;
        Ok(Self {
            client,
            config,
            table_selector,
            out_dir,
        })
    }

    /// Scrape `year` and write its records. Returns the number written.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_year(&self, year: u16) -> Result<usize, ScrapeError> {
        if !self.config.supports_year(year) {
            return Err(ScrapeError::YearOutOfRange {
                year,
                min: self.config.min_year,
                max: self.config.max_year,
            });
        }

        let page_url = Url::parse(&self.config.page_url(year))?;
        let page = fetch_page(&self.client, page_url.as_str()).await?;
        let judgments: Vec<Judgment> =
            parse_judgments(&page.body, &page.base_url, &self.table_selector)?;
        info!(records = judgments.len(), "Extracted judgments");

        write_judgments(&self.out_dir, year, &judgments).await?;
        Ok(judgments.len())
    }
}

impl YearRunner for SciScraper {
    fn run_year(&self, year: u16) -> impl Future<Output = Result<usize, ScrapeError>> + Send {
        self.scrape_year(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the listener's address.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        addr.to_string()
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn config_for(addr: &str) -> ScraperConfig {
        ScraperConfig {
            url_template: format!("http://{addr}/landmark/?judgment_year={{year}}"),
            ..ScraperConfig::default()
        }
    }

    const PAGE: &str = r#"<html><body>
        <div class="landmark_judgment_summary"><table>
          <tr><th>S.No</th><th>Date of Judgment</th><th>Cause Title</th><th>Subject</th><th>Summary</th><th>View</th></tr>
          <tr><td>1</td><td>01-01-2016</td><td>X vs Y</td><td>Constitutional</td><td>Summary text</td><td><a href="view-pdf/123">View</a></td></tr>
        </table></div>
    </body></html>"#;

    #[tokio::test]
    async fn test_fetch_page_rejects_non_200() {
        let addr = serve_once("404 Not Found", "missing".to_string()).await;
        let err = fetch_page(&client(), &format!("http://{addr}/"))
            .await
            .unwrap_err();
        match err {
            ScrapeError::Status { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body_and_base() {
        let addr = serve_once("200 OK", "<p>ok</p>".to_string()).await;
        let page = fetch_page(&client(), &format!("http://{addr}/a/b?x=1"))
            .await
            .unwrap();
        assert_eq!(page.body, "<p>ok</p>");
        assert_eq!(page.base_url.path(), "/a/b");
    }

    #[tokio::test]
    async fn test_scrape_year_writes_records() {
        let addr = serve_once("200 OK", PAGE.to_string()).await;
        let out = tempfile::tempdir().unwrap();
        let scraper =
            SciScraper::with_client(client(), config_for(&addr), out.path().to_path_buf()).unwrap();

        let written = scraper.scrape_year(2016).await.unwrap();
        assert_eq!(written, 1);

        let raw = std::fs::read_to_string(out.path().join("sci_judgments_2016.json")).unwrap();
        let records: Vec<Judgment> = serde_json::from_str(&raw).unwrap();
        assert_eq!(records[0].cause_title, "X vs Y");
        assert_eq!(
            records[0].pdf_link,
            format!("http://{addr}/landmark/view-pdf/123")
        );
    }

    #[tokio::test]
    async fn test_scrape_year_without_records_writes_nothing() {
        let addr = serve_once("200 OK", "<table><tr><th>Date</th></tr></table>".to_string()).await;
        let out = tempfile::tempdir().unwrap();
        let scraper =
            SciScraper::with_client(client(), config_for(&addr), out.path().to_path_buf()).unwrap();

        let err = scraper.scrape_year(2017).await.unwrap_err();
        assert!(matches!(err, ScrapeError::NoJudgments { .. }));
        assert!(!out.path().join("sci_judgments_2017.json").exists());
    }

    #[tokio::test]
    async fn test_year_outside_window_fails_before_fetch() {
        let out = tempfile::tempdir().unwrap();
        let scraper =
            SciScraper::with_client(client(), config_for("127.0.0.1:9"), out.path().to_path_buf())
                .unwrap();
        let err = scraper.scrape_year(2015).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::YearOutOfRange {
                year: 2015,
                min: 2016,
                max: 2025
            }
        ));
    }

    #[test]
    fn test_invalid_table_selector_is_a_parse_error() {
        let config = ScraperConfig {
            table_selector: "table[".to_string(),
            ..ScraperConfig::default()
        };
        let err = SciScraper::with_client(client(), config, PathBuf::from("out")).unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }
}

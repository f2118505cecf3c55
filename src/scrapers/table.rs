//! Row extraction for the landmark judgments table.
//!
//! The table layout differs between years: some pages carry a header row,
//! some prepend a serial-number column, and the PDF link may sit in any cell.
//! Extraction therefore combines a header-derived column map with positional
//! fallbacks:
//!
//! 1. [`locate_table`] picks the landmark table, or the first table on the page.
//! 2. [`HeaderMap::from_header_row`] maps header cells of row 0 to roles.
//! 3. [`extract_judgments`] reads every data row, skipping a leading serial
//!    column when it looks like one.
//! 4. [`find_pdf_link`] scans the row's anchors for the first PDF reference.

use crate::error::ScrapeError;
use crate::models::Judgment;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Up to six ASCII digits, e.g. "1" or "007".
static SERIAL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,6}$").unwrap());

/// Minimum number of data cells before a leading serial column is considered.
const SERIAL_MIN_CELLS: usize = 5;

/// Semantic role of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Date,
    Cause,
    Subject,
    Summary,
    Pdf,
}

impl Role {
    /// Classify a header cell. Rules are checked in order and the first match
    /// wins, so "Date of case" is a date column.
    pub fn classify(header: &str) -> Option<Role> {
        let lower = header.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("date") {
            Some(Role::Date)
        } else if has("cause") || has("case") || has("title") {
            Some(Role::Cause)
        } else if has("subject") {
            Some(Role::Subject)
        } else if has("summary") {
            Some(Role::Summary)
        } else if has("view") || has("pdf") {
            Some(Role::Pdf)
        } else {
            None
        }
    }

    /// Column used when the header does not name this role. `None` for
    /// [`Role::Pdf`], which is always found through the row's anchors.
    fn default_position(self) -> Option<usize> {
        match self {
            Role::Date => Some(0),
            Role::Cause => Some(1),
            Role::Subject => Some(2),
            Role::Summary => Some(3),
            Role::Pdf => None,
        }
    }
}

/// Role to column index mapping derived from the first row of a table.
///
/// Built once per page and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderMap {
    date: Option<usize>,
    cause: Option<usize>,
    subject: Option<usize>,
    summary: Option<usize>,
    pdf: Option<usize>,
    has_header: bool,
}

impl HeaderMap {
    /// Build the map from the `th` cells of `row`.
    pub fn from_header_row(row: ElementRef<'_>) -> Self {
        Self::from_header_texts(row.select(&HEADER_CELL).map(cell_text))
    }

    /// Build the map from header cell texts in column order.
    ///
    /// Empty cells still occupy a column but assign no role. When several cells
    /// claim the same role the rightmost one is kept.
    pub fn from_header_texts<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        cells
            .into_iter()
            .enumerate()
            .fold(HeaderMap::default(), |mut map, (idx, text)| {
                let text = text.as_ref().trim();
                if text.is_empty() {
                    return map;
                }
                map.has_header = true;
                match Role::classify(text) {
                    Some(Role::Date) => map.date = Some(idx),
                    Some(Role::Cause) => map.cause = Some(idx),
                    Some(Role::Subject) => map.subject = Some(idx),
                    Some(Role::Summary) => map.summary = Some(idx),
                    Some(Role::Pdf) => map.pdf = Some(idx),
                    None => {}
                }
                map
            })
    }

    /// Whether the first row carried at least one non-empty header cell.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn index(&self, role: Role) -> Option<usize> {
        match role {
            Role::Date => self.date,
            Role::Cause => self.cause,
            Role::Subject => self.subject,
            Role::Summary => self.summary,
            Role::Pdf => self.pdf,
        }
    }

    /// Read the text for `role` from a row's cells.
    ///
    /// Header-mapped indices are absolute. The positional default is offset by
    /// `shift` when the row has a serial column.
    fn read(&self, role: Role, cells: &[String], shift: usize) -> String {
        if let Some(idx) = self.index(role).filter(|&idx| idx < cells.len()) {
            return cells[idx].clone();
        }
        role.default_position()
            .and_then(|pos| cells.get(pos + shift))
            .cloned()
            .unwrap_or_default()
    }
}

/// Find the table to extract from: `landmark` first, then any table.
pub fn locate_table<'a>(document: &'a Html, landmark: &Selector) -> Option<ElementRef<'a>> {
    document
        .select(landmark)
        .next()
        .or_else(|| document.select(&TABLE).next())
}

/// Parse a page and extract its judgments.
///
/// Locates the judgments table, maps its header row (if any) and reads one
/// record per data row in document order.
///
/// # Arguments
///
/// * `html` - The raw page body
/// * `base` - URL the page was served from, used to resolve relative PDF links
/// * `landmark` - Selector for the landmark table; the first table on the page
///   is used when it matches nothing
///
/// # Returns
///
/// The non-empty list of records found on the page.
///
/// # Errors
///
/// - [`ScrapeError::TableNotFound`] when the page has no table at all
/// - [`ScrapeError::NoJudgments`] when the table yields no records
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://www.sci.gov.in/landmark-judgment-summaries/")?;
/// let landmark = Selector::parse(".landmark_judgment_summary table").unwrap();
/// let judgments = parse_judgments(&body, &base, &landmark)?;
/// ```
pub fn parse_judgments(
    html: &str,
    base: &Url,
    landmark: &Selector,
) -> Result<Vec<Judgment>, ScrapeError> {
    let document = Html::parse_document(html);
    let table = locate_table(&document, landmark).ok_or_else(|| ScrapeError::TableNotFound {
        url: base.to_string(),
    })?;

    let judgments = extract_judgments(table, base);
    if judgments.is_empty() {
        return Err(ScrapeError::NoJudgments {
            url: base.to_string(),
        });
    }
    Ok(judgments)
}

/// Extract one [`Judgment`] per data row of `table`, in document order.
pub fn extract_judgments(table: ElementRef<'_>, base: &Url) -> Vec<Judgment> {
    let rows: Vec<ElementRef<'_>> = table.select(&ROW).collect();
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let header = HeaderMap::from_header_row(*first);
    let skip = usize::from(header.has_header());
    debug!(?header, rows = rows.len(), "Built header map");

    rows.iter()
        .skip(skip)
        .filter_map(|row| extract_row(*row, &header, base))
        .collect()
}

fn extract_row(row: ElementRef<'_>, header: &HeaderMap, base: &Url) -> Option<Judgment> {
    let cells: Vec<String> = row.select(&DATA_CELL).map(cell_text).collect();
    if cells.is_empty() {
        return None;
    }

    let shift = usize::from(has_serial_column(&cells));
    let judgment = Judgment {
        date: header.read(Role::Date, &cells, shift),
        cause_title: header.read(Role::Cause, &cells, shift),
        subject: header.read(Role::Subject, &cells, shift),
        summary: header.read(Role::Summary, &cells, shift),
        pdf_link: find_pdf_link(row, base),
    };

    (!judgment.is_empty()).then_some(judgment)
}

/// A row starts with a serial column when it has at least five cells and the
/// first one is a short run of digits.
pub fn has_serial_column<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.len() >= SERIAL_MIN_CELLS
        && cells
            .first()
            .is_some_and(|first| SERIAL_NUMBER.is_match(first.as_ref().trim()))
}

/// Return the absolute URL of the first anchor in `row` that points at a PDF,
/// or an empty string when there is none.
pub fn find_pdf_link(row: ElementRef<'_>, base: &Url) -> String {
    row.select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| is_pdf_href(href))
        .map(|href| resolve_href(base, href))
        .unwrap_or_default()
}

/// `.pdf` files and the site's `view-pdf` handler both count.
pub fn is_pdf_href(href: &str) -> bool {
    let lower = href.trim().to_lowercase();
    lower.ends_with(".pdf") || lower.contains("view-pdf")
}

/// Resolve `href` against `base`. Absolute URLs are returned unchanged and
/// anything that cannot be resolved is returned as written.
pub fn resolve_href(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    match Url::parse(href) {
        Ok(_) => href.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string()),
        Err(_) => href.to_string(),
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

//! Data models for scraped judgments and scheduler bookkeeping.
//!
//! - [`Judgment`]: one row of the landmark judgments table
//! - [`Job`]: one year's unit of work
//! - [`RunResult`] / [`Outcome`]: what happened to a job once it reached a
//!   terminal state

use serde::{Deserialize, Serialize};

/// A single judgment record extracted from a table row.
///
/// Every field is free text copied from the page. A field the row does not
/// provide is left empty and serialized as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Judgment {
    /// Date of judgment as printed on the page.
    #[serde(rename = "judgment_date")]
    pub date: String,
    /// Cause title and/or case number.
    #[serde(rename = "cause_title_case_no")]
    pub cause_title: String,
    /// Subject classification.
    pub subject: String,
    /// Short summary of the judgment.
    #[serde(rename = "judgment_summary")]
    pub summary: String,
    /// Absolute URL of the judgment PDF (or the site's PDF viewer).
    pub pdf_link: String,
}

impl Judgment {
    /// `true` when every field is empty; such rows are dropped.
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
            && self.cause_title.is_empty()
            && self.subject.is_empty()
            && self.summary.is_empty()
            && self.pdf_link.is_empty()
    }
}

/// One year's fetch-extract-write unit of work.
///
/// Jobs are moved into the queue and consumed by exactly one worker.
#[derive(Debug, PartialEq, Eq)]
pub struct Job {
    /// Position of the year in the requested list, used to report results in
    /// input order.
    pub seq: usize,
    pub year: u16,
}

/// Terminal state of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The year was written with this many records.
    Succeeded { records: usize },
    /// Every allowed attempt failed; holds the last error message.
    Abandoned { error: String },
}

/// Result of running one job to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub year: u16,
    /// Number of attempts made, including the successful one.
    pub attempts: u32,
    pub outcome: Outcome,
}

impl RunResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_judgment_is_empty() {
        assert!(Judgment::default().is_empty());
    }

    #[test]
    fn test_single_field_makes_judgment_non_empty() {
        let j = Judgment {
            pdf_link: "https://example.org/a.pdf".into(),
            ..Default::default()
        };
        assert!(!j.is_empty());
    }

    #[test]
    fn test_judgment_serializes_with_site_field_names() {
        let j = Judgment {
            date: "01-01-2016".into(),
            cause_title: "X vs Y".into(),
            subject: "Constitutional".into(),
            summary: "Summary text".into(),
            pdf_link: String::new(),
        };
        let value = serde_json::to_value(&j).unwrap();
        assert_eq!(value["judgment_date"], "01-01-2016");
        assert_eq!(value["cause_title_case_no"], "X vs Y");
        assert_eq!(value["subject"], "Constitutional");
        assert_eq!(value["judgment_summary"], "Summary text");
        assert_eq!(value["pdf_link"], "");
    }
}

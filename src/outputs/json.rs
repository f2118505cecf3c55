//! Per-year JSON output.
//!
//! Each successful year produces one file:
//! ```text
//! out_dir/
//! ├── sci_judgments_2016.json
//! └── sci_judgments_2017.json
//! ```
//!
//! The file holds a pretty-printed array of records with a trailing newline.
//! `serde_json` leaves `&`, `<` and `>` unescaped, so PDF query strings stay
//! readable.

use crate::error::ScrapeError;
use crate::models::Judgment;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name for a year's records.
pub fn output_filename(year: u16) -> String {
    format!("sci_judgments_{year}.json")
}

/// Write a year's judgments to `{out_dir}/sci_judgments_{year}.json`.
///
/// The JSON is written to a sibling `.tmp` file first and renamed into place,
/// so a failed write never leaves a truncated file under the final name.
///
/// # Arguments
///
/// * `out_dir` - Output directory, created if it doesn't exist
/// * `year` - Year the records belong to; keys the file name
/// * `judgments` - Records to serialize, in page order
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns [`ScrapeError::Json`] if serialization fails and
/// [`ScrapeError::Io`] if the directory, temp file or rename fails.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), year = year, records = judgments.len()))]
pub async fn write_judgments(
    out_dir: &Path,
    year: u16,
    judgments: &[Judgment],
) -> Result<PathBuf, ScrapeError> {
    let mut json = serde_json::to_string_pretty(judgments)?;
    json.push('\n');

    if let Err(e) = fs::create_dir_all(out_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = out_dir.join(output_filename(year));
    let tmp_path = temp_path(&path);
    let written = match fs::write(&tmp_path, json).await {
        Ok(()) => fs::rename(&tmp_path, &path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        error!(path = %path.display(), error = %e, "Failed to write judgments JSON");
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    info!(path = %path.display(), "Wrote judgments JSON");
    Ok(path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Judgment> {
        vec![Judgment {
            date: "01-01-2016".into(),
            cause_title: "X vs Y".into(),
            subject: "Constitutional".into(),
            summary: "Summary text".into(),
            pdf_link: "https://www.sci.gov.in/view-pdf/?diary_no=1&type=j".into(),
        }]
    }

    #[test]
    fn test_output_filename_is_keyed_by_year() {
        assert_eq!(output_filename(2018), "sci_judgments_2018.json");
    }

    #[tokio::test]
    async fn test_write_judgments_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let path = write_judgments(&out, 2016, &sample()).await.unwrap();

        assert_eq!(path, out.join("sci_judgments_2016.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Judgment> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, sample());
    }

    #[tokio::test]
    async fn test_ampersand_is_not_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_judgments(dir.path(), 2016, &sample()).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(raw.contains("diary_no=1&type=j"));
        assert!(!raw.contains("\\u0026"));
        assert!(raw.contains("\n  {\n    \"judgment_date\""));
        assert!(raw.ends_with("]\n"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_after_write() {
        let dir = tempfile::tempdir().unwrap();
        write_judgments(dir.path(), 2016, &sample()).await.unwrap();
        assert!(!dir.path().join("sci_judgments_2016.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory squatting on the target name makes the final rename fail
        let target = dir.path().join("sci_judgments_2016.json");
        std::fs::create_dir(&target).unwrap();

        let err = write_judgments(dir.path(), 2016, &sample()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
        assert!(target.is_dir());
        assert!(!dir.path().join("sci_judgments_2016.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = write_judgments(file.path(), 2016, &sample()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
    }
}

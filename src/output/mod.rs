//! Output formatting module.
//!
//! Console progress lines, and report files in text, JSON, or CSV form
//! together with the flat URL list.

mod csv_format;
mod json_format;
mod plain;
pub mod report;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    format_match_line, match_detail, print_error, print_info, print_scan_header, print_success,
    print_summary, print_warning, status_style, LivePrinter,
};
pub use report::{write_text, write_url_list, ClassifiedReport};

use crate::cli::OutputFormat;
use crate::error::{ReportError, ReportResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Files written by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub report: PathBuf,
    pub url_list: Option<PathBuf>,
}

/// Writes a classified report and its URL list to disk.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    format: OutputFormat,
    report_path: PathBuf,
    url_list_path: Option<PathBuf>,
}

impl ReportWriter {
    /// Write `format` to `report_path`, with no URL list.
    pub fn new(format: OutputFormat, report_path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            report_path: report_path.into(),
            url_list_path: None,
        }
    }

    /// Also write the flat URL list to `path`.
    pub fn with_url_list(mut self, path: Option<PathBuf>) -> Self {
        self.url_list_path = path;
        self
    }

    /// Save the report. Returns `None` without touching the filesystem when
    /// there is nothing to save.
    pub fn save(&self, report: &ClassifiedReport) -> ReportResult<Option<SavedReport>> {
        if report.is_empty() {
            return Ok(None);
        }

        let mut out = create(&self.report_path)?;
        match self.format {
            OutputFormat::Text => write_text(report, &mut out)
                .and_then(|()| out.flush())
                .map_err(|e| write_error(&self.report_path, e))?,
            OutputFormat::Json => {
                write_json(report, &mut out)?;
                out.flush().map_err(|e| write_error(&self.report_path, e))?;
            }
            OutputFormat::Csv => write_csv(report, &mut out)?,
        }

        let url_list = match &self.url_list_path {
            Some(path) => {
                let mut out = create(path)?;
                write_url_list(report, &mut out)
                    .and_then(|()| out.flush())
                    .map_err(|e| write_error(path, e))?;
                Some(path.clone())
            }
            None => None,
        };

        Ok(Some(SavedReport {
            report: self.report_path.clone(),
            url_list,
        }))
    }
}

fn create(path: &Path) -> ReportResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| write_error(path, e))
}

fn write_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ProbeOutcome;
    use crate::types::{Protocol, Target};
    use std::fs;

    fn sample() -> ClassifiedReport {
        ClassifiedReport::classify(vec![
            ProbeOutcome::response(Target::new("a.test", 80, Protocol::Http), 200)
                .with_title("Example"),
            ProbeOutcome::response(Target::new("a.test", 8080, Protocol::Http), 401),
        ])
    }

    #[test]
    fn test_save_text_and_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("results.txt");
        let urls_path = dir.path().join("urls_list.txt");

        let saved = ReportWriter::new(OutputFormat::Text, &report_path)
            .with_url_list(Some(urls_path.clone()))
            .save(&sample())
            .unwrap()
            .unwrap();

        assert_eq!(saved.report, report_path);
        assert_eq!(saved.url_list, Some(urls_path.clone()));
        assert!(fs::read_to_string(&report_path).unwrap().contains("Title: Example"));
        assert_eq!(
            fs::read_to_string(&urls_path).unwrap(),
            "http://a.test:80\nhttp://a.test:8080\n"
        );
    }

    #[test]
    fn test_empty_report_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("results.txt");
        let urls_path = dir.path().join("urls_list.txt");

        let saved = ReportWriter::new(OutputFormat::Text, &report_path)
            .with_url_list(Some(urls_path.clone()))
            .save(&ClassifiedReport::classify(Vec::new()))
            .unwrap();

        assert!(saved.is_none());
        assert!(!report_path.exists());
        assert!(!urls_path.exists());
    }

    #[test]
    fn test_save_json_without_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("results.json");

        let saved = ReportWriter::new(OutputFormat::Json, &report_path)
            .save(&sample())
            .unwrap()
            .unwrap();

        assert!(saved.url_list.is_none());
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(value["total"], 2);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("missing").join("results.txt");

        let result = ReportWriter::new(OutputFormat::Csv, &report_path).save(&sample());
        assert!(matches!(result, Err(ReportError::Write { .. })));
    }
}

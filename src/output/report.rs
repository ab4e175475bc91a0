//! Report building.
//!
//! Groups matched outcomes by status code and writes them in the fixed
//! priority order, never in numeric or collection order.

use crate::scanner::ProbeOutcome;
use crate::types::status::{self, PRIORITY_ORDER};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Matched outcomes grouped by status code.
#[derive(Debug, Clone)]
pub struct ClassifiedReport {
    groups: HashMap<u16, Vec<ProbeOutcome>>,
    generated_at: DateTime<Local>,
}

impl ClassifiedReport {
    /// Group outcomes by status code. Non-matching outcomes are ignored.
    pub fn classify(outcomes: impl IntoIterator<Item = ProbeOutcome>) -> Self {
        let mut groups: HashMap<u16, Vec<ProbeOutcome>> = HashMap::new();
        for outcome in outcomes.into_iter().filter(|o| o.matched) {
            groups.entry(outcome.status_code).or_default().push(outcome);
        }
        Self {
            groups,
            generated_at: Local::now(),
        }
    }

    /// Override the report timestamp.
    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// When the report was built.
    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// Formatted timestamp used in report headers.
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Total number of matched outcomes.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of outcomes with `code`.
    pub fn count(&self, code: u16) -> usize {
        self.groups.get(&code).map_or(0, Vec::len)
    }

    /// Share of `code` in the total, in percent. 0 when the report is empty.
    pub fn percentage(&self, code: u16) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(code) as f64 / total as f64 * 100.0
        }
    }

    /// Non-empty groups in priority order.
    pub fn sections(&self) -> impl Iterator<Item = (u16, &[ProbeOutcome])> + '_ {
        PRIORITY_ORDER.iter().filter_map(move |code| {
            self.groups
                .get(code)
                .filter(|outcomes| !outcomes.is_empty())
                .map(|outcomes| (*code, outcomes.as_slice()))
        })
    }

    /// Every matched outcome in priority order.
    pub fn outcomes(&self) -> impl Iterator<Item = &ProbeOutcome> + '_ {
        self.sections().flat_map(|(_, outcomes)| outcomes.iter())
    }

    /// Every matched URL in priority order.
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.outcomes().map(|outcome| outcome.url.as_str())
    }
}

/// Write the structured text report.
pub fn write_text<W: Write>(report: &ClassifiedReport, out: &mut W) -> io::Result<()> {
    let timestamp = report.timestamp();
    let codes: Vec<String> = status::codes().map(|c| c.to_string()).collect();
    let heavy = "=".repeat(80);
    let section = "=".repeat(60);
    let rule = "-".repeat(60);

    writeln!(out, "{heavy}")?;
    writeln!(out, "HTTP scan results - {timestamp}")?;
    writeln!(out, "Watched status codes: {}", codes.join(", "))?;
    writeln!(out, "{heavy}")?;
    writeln!(out)?;

    for (code, outcomes) in report.sections() {
        writeln!(out)?;
        writeln!(out, "{section}")?;
        writeln!(
            out,
            "Status {}: {}",
            code,
            status::description(code).unwrap_or_default()
        )?;
        writeln!(out, "Found: {}", outcomes.len())?;
        writeln!(out, "{section}")?;
        writeln!(out)?;

        for outcome in outcomes {
            writeln!(out, "URL: {}", outcome.url)?;
            if code == 200 {
                writeln!(out, "Title: {}", outcome.title)?;
            } else if status::is_redirect(code) && !outcome.redirect_url.is_empty() {
                writeln!(out, "Redirects to: {}", outcome.redirect_url)?;
            }
            writeln!(out, "Port: {} ({})", outcome.port(), outcome.protocol())?;
            writeln!(out, "{rule}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{heavy}")?;
    writeln!(out, "Statistics")?;
    writeln!(out, "{heavy}")?;
    writeln!(out, "Completed at: {timestamp}")?;
    writeln!(out, "Total: {} matching responses", report.total())?;
    writeln!(out)?;

    for (code, outcomes) in report.sections() {
        writeln!(
            out,
            "Status {}: {} ({:.1}%)",
            code,
            outcomes.len(),
            report.percentage(code)
        )?;
    }

    Ok(())
}

/// Write matched URLs, one per line, in priority order.
pub fn write_url_list<W: Write>(report: &ClassifiedReport, out: &mut W) -> io::Result<()> {
    for url in report.urls() {
        writeln!(out, "{url}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ErrorKind;
    use crate::types::{Protocol, Target};
    use chrono::TimeZone;

    fn outcome(host: &str, port: u16, code: u16) -> ProbeOutcome {
        let protocol = if port == 443 { Protocol::Https } else { Protocol::Http };
        ProbeOutcome::response(Target::new(host, port, protocol), code)
    }

    fn render(report: &ClassifiedReport) -> String {
        let mut buf = Vec::new();
        write_text(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_classify_groups_by_status() {
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 80, 200),
            outcome("b.test", 80, 200),
            outcome("a.test", 443, 403),
        ]);
        assert_eq!(report.total(), 3);
        assert_eq!(report.count(200), 2);
        assert_eq!(report.count(403), 1);
        assert_eq!(report.count(500), 0);
    }

    #[test]
    fn test_classify_ignores_unmatched() {
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 80, 404),
            ProbeOutcome::failed(Target::new("a.test", 443, Protocol::Https), ErrorKind::Timeout),
        ]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_sections_follow_priority_order() {
        // Collected in an order unrelated to priority.
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 80, 308),
            outcome("a.test", 80, 301),
            outcome("a.test", 80, 400),
            outcome("a.test", 80, 429),
            outcome("a.test", 80, 503),
            outcome("a.test", 80, 500),
            outcome("a.test", 80, 403),
            outcome("a.test", 80, 401),
            outcome("a.test", 80, 200),
            outcome("a.test", 80, 307),
            outcome("a.test", 80, 302),
        ]);
        let order: Vec<u16> = report.sections().map(|(code, _)| code).collect();
        assert_eq!(order, PRIORITY_ORDER.to_vec());
    }

    #[test]
    fn test_sections_skip_absent_codes() {
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 80, 302),
            outcome("a.test", 80, 500),
            outcome("a.test", 80, 200),
        ]);
        let order: Vec<u16> = report.sections().map(|(code, _)| code).collect();
        assert_eq!(order, vec![200, 500, 302]);
    }

    #[test]
    fn test_percentage() {
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 80, 200),
            outcome("b.test", 80, 200),
            outcome("c.test", 80, 403),
        ]);
        assert_eq!(format!("{:.1}", report.percentage(200)), "66.7");
        assert_eq!(format!("{:.1}", report.percentage(403)), "33.3");
    }

    #[test]
    fn test_percentage_empty_report() {
        let report = ClassifiedReport::classify(Vec::new());
        for code in PRIORITY_ORDER {
            assert_eq!(report.percentage(code), 0.0);
        }
    }

    #[test]
    fn test_text_report_layout() {
        let report = ClassifiedReport::classify(vec![
            outcome("a.test", 443, 301).with_redirect("https://other.test/"),
            outcome("a.test", 80, 200).with_title("Example"),
            outcome("b.test", 80, 403),
        ])
        .with_timestamp(fixed_time());

        let text = render(&report);

        assert!(text.contains("HTTP scan results - 2024-05-01 12:30:00"));
        assert!(text.contains("Watched status codes: 200, 301, 302, 307, 308, 400, 401, 403, 429, 500, 503"));
        assert!(text.contains("Title: Example"));
        assert!(text.contains("Redirects to: https://other.test/"));
        assert!(text.contains("Port: 443 (https)"));
        assert!(text.contains("Total: 3 matching responses"));
        assert!(text.contains("Status 200: 1 (33.3%)"));

        let pos_200 = text.find("Status 200: 200 OK").unwrap();
        let pos_403 = text.find("Status 403: 403 Forbidden").unwrap();
        let pos_301 = text.find("Status 301: 301 Moved").unwrap();
        assert!(pos_200 < pos_403 && pos_403 < pos_301);
    }

    #[test]
    fn test_redirect_without_target_omits_line() {
        let report = ClassifiedReport::classify(vec![outcome("a.test", 80, 302)]);
        let text = render(&report);
        assert!(!text.contains("Redirects to:"));
        assert!(text.contains("URL: http://a.test:80"));
    }

    #[test]
    fn test_url_list_priority_order() {
        let report = ClassifiedReport::classify(vec![
            outcome("c.test", 80, 302),
            outcome("b.test", 80, 401),
            outcome("a.test", 80, 200),
        ]);
        let mut buf = Vec::new();
        write_url_list(&report, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "http://a.test:80\nhttp://b.test:80\nhttp://c.test:80\n"
        );
    }
}

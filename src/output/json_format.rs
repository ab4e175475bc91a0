//! JSON report output.

use crate::output::report::ClassifiedReport;
use crate::scanner::ProbeOutcome;
use crate::types::status;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    status_codes: Vec<u16>,
    total: usize,
    sections: Vec<JsonSection<'a>>,
}

#[derive(Serialize)]
struct JsonSection<'a> {
    status_code: u16,
    description: &'static str,
    count: usize,
    percentage: f64,
    outcomes: &'a [ProbeOutcome],
}

/// Write the report as pretty-printed JSON, sections in priority order.
pub fn write_json<W: Write>(report: &ClassifiedReport, out: W) -> serde_json::Result<()> {
    let document = JsonReport {
        generated_at: report.generated_at().to_rfc3339(),
        status_codes: status::codes().collect(),
        total: report.total(),
        sections: report
            .sections()
            .map(|(code, outcomes)| JsonSection {
                status_code: code,
                description: status::description(code).unwrap_or_default(),
                count: outcomes.len(),
                percentage: (report.percentage(code) * 10.0).round() / 10.0,
                outcomes,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(out, &document)
}

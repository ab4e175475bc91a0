//! CSV report output.

use crate::output::report::ClassifiedReport;
use std::io::Write;

/// Write one row per matched outcome, in priority order.
pub fn write_csv<W: Write>(report: &ClassifiedReport, out: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record([
        "status_code",
        "url",
        "host",
        "port",
        "protocol",
        "title",
        "redirect_url",
    ])?;

    for outcome in report.outcomes() {
        let status_code = outcome.status_code.to_string();
        let port = outcome.port().to_string();
        wtr.write_record([
            status_code.as_str(),
            outcome.url.as_str(),
            outcome.target.host.as_str(),
            port.as_str(),
            outcome.protocol().scheme(),
            outcome.title.as_str(),
            outcome.redirect_url.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ProbeOutcome;
    use crate::types::{Protocol, Target};

    #[test]
    fn test_csv_rows() {
        let report = ClassifiedReport::classify(vec![
            ProbeOutcome::response(Target::new("a.test", 8080, Protocol::Http), 302)
                .with_redirect("http://a.test:8080/login"),
            ProbeOutcome::response(Target::new("b.test", 80, Protocol::Http), 200)
                .with_title("Welcome, friend"),
        ]);

        let mut buf = Vec::new();
        write_csv(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "status_code,url,host,port,protocol,title,redirect_url");
        assert_eq!(lines[1], "200,http://b.test:80,b.test,80,http,\"Welcome, friend\",");
        assert_eq!(
            lines[2],
            "302,http://a.test:8080,a.test,8080,http,,http://a.test:8080/login"
        );
    }
}

//! Console output.
//!
//! Produces human-readable, colored lines for scan progress and summaries.
//! Report files are written by [`super::report`] without styling.

use crate::output::report::ClassifiedReport;
use crate::scanner::title::NO_TITLE;
use crate::scanner::ProbeOutcome;
use crate::types::status::{self, StatusClass};
use console::{style, Style};
use indicatif::ProgressBar;

/// Prints per-host matches as they are found.
///
/// Lines go through the progress bar when one is active so they do not
/// tear its redraws.
#[derive(Clone, Default)]
pub struct LivePrinter {
    progress: Option<ProgressBar>,
    quiet: bool,
}

impl LivePrinter {
    pub fn new(progress: Option<ProgressBar>, quiet: bool) -> Self {
        Self { progress, quiet }
    }

    /// Print one match line, preceded by the host header for the first
    /// match of a host. Both lines go out in one write so concurrent hosts
    /// cannot split them.
    pub fn print_match(&self, host: &str, outcome: &ProbeOutcome, first: bool) {
        if self.quiet {
            return;
        }

        let line = format_match_line(outcome);
        if first {
            self.emit(&format!(
                "{} {}\n{}",
                style("[+]").green().bold(),
                style(host).bold(),
                line
            ));
        } else {
            self.emit(&line);
        }
    }

    /// Print a `[!]` notice about the run itself.
    pub fn notice(&self, msg: &str) {
        self.emit(&format!("{} {}", style("[!]").yellow().bold(), msg));
    }

    /// Print a free-form line.
    pub fn emit(&self, text: &str) {
        if self.quiet {
            return;
        }
        match &self.progress {
            Some(pb) => pb.println(text),
            None => println!("{}", text),
        }
    }
}

/// Console style for a status code.
pub fn status_style(code: u16) -> Style {
    match status::class(code) {
        Some(StatusClass::Success) => Style::new().green(),
        Some(StatusClass::Redirect) => Style::new().blue(),
        Some(StatusClass::ClientError) => Style::new().yellow(),
        Some(StatusClass::ServerError) => Style::new().red(),
        None => Style::new(),
    }
}

/// Render the detail column of a match line.
pub fn match_detail(outcome: &ProbeOutcome) -> String {
    let code = outcome.status_code;
    if code == 200 {
        if outcome.title.is_empty() {
            NO_TITLE.to_string()
        } else {
            outcome.title.clone()
        }
    } else if status::is_redirect(code) {
        if outcome.redirect_url.is_empty() {
            "redirect".to_string()
        } else {
            format!("-> {}", outcome.redirect_url)
        }
    } else {
        status::short_description(code).unwrap_or_default().to_string()
    }
}

/// Render a single indented match line.
pub fn format_match_line(outcome: &ProbeOutcome) -> String {
    let code = status_style(outcome.status_code).apply_to(format!("[{}]", outcome.status_code));
    format!(
        "    {} {:<45} | {}",
        code,
        outcome.url,
        match_detail(outcome)
    )
}

/// Print the banner shown before scanning begins.
pub fn print_scan_header(host_count: usize, workers: usize, timeout_secs: u64) {
    let codes: Vec<String> = status::codes().map(|c| c.to_string()).collect();
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("httpscout").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Read {} hosts",
        style("•").dim(),
        style(host_count).white().bold()
    );
    println!(
        "{} Watching status codes: {}",
        style("•").dim(),
        style(codes.join(", ")).yellow()
    );
    println!(
        "{} {} workers, {}s timeout",
        style("•").dim(),
        workers,
        timeout_secs
    );
    println!("{} Press Ctrl+C to stop at any time", style("•").dim());
    println!("{}", style("═".repeat(80)).cyan());
}

/// Print the per-code summary after scanning.
pub fn print_summary(report: &ClassifiedReport) {
    println!();
    println!("{}", style("═".repeat(80)).cyan());
    println!("{}", style("Scan complete").cyan().bold());
    println!("{}", style("═".repeat(80)).cyan());

    if report.is_empty() {
        println!("  {}", style("No responses with watched status codes.").dim());
        return;
    }

    for (code, outcomes) in report.sections() {
        println!(
            "  {}: {} ({})",
            status_style(code).apply_to(code),
            outcomes.len(),
            status::short_description(code).unwrap_or_default()
        );
    }
    println!();
    println!(
        "  {} {} matching responses",
        style("Total:").bold(),
        style(report.total()).green().bold()
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

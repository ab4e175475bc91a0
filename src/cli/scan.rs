//! Scan subcommand implementation.
//!
//! Handles the `httpscout scan <input>` command.

use crate::cli::OutputFormat;
use crate::config::{load_settings, AppSettings};
use crate::error::CliResult;
use crate::output::{self, ClassifiedReport, ReportWriter};
use crate::scanner::{CancellationFlag, HttpProber, RateLimiter, ScanJobConfig, ScanOrchestrator};
use crate::types::read_host_list;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Probe every host in a host list.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Host list, one host per line
    ///
    /// Entries may carry a scheme or path (`https://example.com/login`);
    /// only the host part is used.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report file [default: http_scanner_results.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 5]
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of hosts scanned at once [default: 10]
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Report file format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// File receiving the flat list of matched URLs [default: urls_list.txt]
    #[arg(long, value_name = "FILE")]
    pub url_list: Option<PathBuf>,

    /// Maximum requests per second across all workers (0 = unlimited)
    #[arg(short, long = "rate", value_name = "RATE")]
    pub rate_limit: Option<u32>,

    /// Don't write the URL list
    #[arg(long)]
    pub no_urls: bool,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(
        &self,
        verbose: bool,
        quiet: bool,
        config: Option<&Path>,
        cancel: CancellationFlag,
    ) -> CliResult<()> {
        let settings = self.apply(load_settings(config)?);
        settings.validate()?;

        let hosts = read_host_list(&self.input)?;
        if hosts.is_empty() {
            output::print_warning(&format!(
                "No hosts found in '{}', nothing to scan",
                self.input.display()
            ));
            return Ok(());
        }

        if !quiet {
            output::print_scan_header(
                hosts.len(),
                settings.default_max_workers,
                settings.default_timeout_secs,
            );
        }

        let timeout = Duration::from_secs(settings.default_timeout_secs);
        let prober = HttpProber::new(timeout, cancel.clone())?
            .with_rate_limiter(RateLimiter::per_second(settings.default_rate_limit));

        let mut job_config = ScanJobConfig::new(settings.default_max_workers, timeout);
        if verbose {
            job_config = job_config.with_verbose();
        }
        if quiet {
            job_config = job_config.with_quiet();
        }

        let summary = ScanOrchestrator::new(Arc::new(prober), job_config, cancel)
            .run(hosts)
            .await;
        info!(
            submitted = summary.hosts_submitted,
            scanned = summary.hosts_scanned,
            timed_out = summary.timed_out.len(),
            duration_ms = summary.duration_ms,
            "scan summary"
        );

        if summary.cancelled {
            output::print_warning("Scan aborted, saving results collected so far");
        }

        let report = ClassifiedReport::classify(summary.outcomes);
        if !quiet {
            output::print_summary(&report);
        }

        let url_list = (!self.no_urls).then(|| settings.url_list_file.clone());
        let saved = ReportWriter::new(self.format, &settings.default_output_file)
            .with_url_list(url_list)
            .save(&report)?;

        match saved {
            Some(saved) => {
                output::print_success(&format!(
                    "Report saved to {} ({})",
                    saved.report.display(),
                    self.format
                ));
                if let Some(path) = saved.url_list {
                    output::print_success(&format!("URL list saved to {}", path.display()));
                }
            }
            None => output::print_warning("Nothing to save"),
        }

        Ok(())
    }

    /// Overlay command-line flags on loaded settings.
    fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(output) = &self.output {
            settings.default_output_file = output.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.default_timeout_secs = timeout;
        }
        if let Some(workers) = self.workers {
            settings.default_max_workers = workers;
        }
        if let Some(url_list) = &self.url_list {
            settings.url_list_file = url_list.clone();
        }
        if let Some(rate) = self.rate_limit {
            settings.default_rate_limit = rate;
        }
        settings
    }
}

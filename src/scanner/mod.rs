//! Scanner module - probes hosts and coordinates the worker pool.
//!
//! One task per host runs the [`DomainScanner`]; a semaphore bounds how many
//! hosts are in flight at once. Ports within a host are probed sequentially.

pub mod cancel;
pub mod domain;
pub mod http;
pub mod rate_limiter;
pub mod redirect;
pub mod title;
pub mod traits;

pub use cancel::CancellationFlag;
pub use domain::{DomainScanner, HostResult};
pub use http::HttpProber;
pub use rate_limiter::RateLimiter;
pub use traits::{ErrorKind, ProbeOutcome, Prober};

use crate::output::LivePrinter;
use crate::types::{CatalogEntry, TARGET_CATALOG};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Configuration for a scan job.
#[derive(Debug, Clone)]
pub struct ScanJobConfig {
    /// Maximum number of hosts scanned at once.
    pub max_workers: usize,
    /// Per-request timeout.
    pub probe_timeout: Duration,
    /// Show a progress bar.
    pub verbose: bool,
    /// Suppress per-host lines.
    pub quiet: bool,
}

impl ScanJobConfig {
    /// Default pool width.
    pub const DEFAULT_WORKERS: usize = 10;

    /// Create a job configuration.
    pub fn new(max_workers: usize, probe_timeout: Duration) -> Self {
        Self {
            max_workers: max_workers.max(1),
            probe_timeout,
            verbose: false,
            quiet: false,
        }
    }

    /// Enable the progress bar.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Suppress per-host output.
    pub fn with_quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// How long in-flight hosts may take to hand back results once the run
    /// is cancelled: twice the probe timeout.
    pub fn collection_timeout(&self) -> Duration {
        self.probe_timeout.saturating_mul(2)
    }
}

impl Default for ScanJobConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WORKERS, Duration::from_secs(5))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Matched outcomes of all hosts, in task completion order.
    pub outcomes: Vec<ProbeOutcome>,
    /// Hosts read from the input.
    pub hosts_total: usize,
    /// Hosts handed to the pool.
    pub hosts_submitted: usize,
    /// Hosts whose scan ran (fully or up to cancellation).
    pub hosts_scanned: usize,
    /// Hosts dropped because they could not finish after cancellation.
    pub timed_out: Vec<String>,
    /// Whether the run was cancelled.
    pub cancelled: bool,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

type TaskOutput = (usize, Option<HostResult>);

/// Runs one [`DomainScanner`] per host on a bounded pool.
pub struct ScanOrchestrator {
    prober: Arc<dyn Prober>,
    config: ScanJobConfig,
    cancel: CancellationFlag,
    catalog: Vec<CatalogEntry>,
}

impl ScanOrchestrator {
    /// Create an orchestrator over the standard catalog.
    pub fn new(prober: Arc<dyn Prober>, config: ScanJobConfig, cancel: CancellationFlag) -> Self {
        Self {
            prober,
            config,
            cancel,
            catalog: TARGET_CATALOG.to_vec(),
        }
    }

    /// Replace the catalog used for every host.
    pub fn with_catalog(mut self, catalog: Vec<CatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Scan every host and collect the matched outcomes.
    ///
    /// Never fails. On cancellation, hosts not yet started are withdrawn,
    /// in-flight hosts get [`ScanJobConfig::collection_timeout`] to return
    /// their partial results, and any still running after that are aborted
    /// and listed in [`ScanSummary::timed_out`].
    pub async fn run(&self, hosts: Vec<String>) -> ScanSummary {
        let start = Instant::now();
        let progress = self.progress_bar(hosts.len());
        let printer = LivePrinter::new(progress.clone(), self.config.quiet);

        let scanner = Arc::new(
            DomainScanner::new(Arc::clone(&self.prober), self.cancel.clone())
                .with_catalog(self.catalog.clone())
                .with_printer(printer.clone()),
        );
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));

        let mut summary = ScanSummary {
            hosts_total: hosts.len(),
            ..ScanSummary::default()
        };
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        let mut pending: BTreeMap<usize, String> = BTreeMap::new();

        for (index, host) in hosts.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                printer.notice("Stopping task submission...");
                break;
            }

            let scanner = Arc::clone(&scanner);
            let semaphore = Arc::clone(&semaphore);
            let cancel = self.cancel.clone();
            let task_host = host.clone();

            tasks.spawn(async move {
                // A closed semaphore means the run was cancelled while queued.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, None);
                };
                if cancel.is_cancelled() {
                    return (index, None);
                }
                (index, Some(scanner.scan(&task_host).await))
            });
            pending.insert(index, host);
        }
        summary.hosts_submitted = pending.len();
        info!(hosts = summary.hosts_submitted, workers = self.config.max_workers, "scan started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                joined = tasks.join_next() => match joined {
                    Some(joined) => Self::collect(joined, &mut pending, &mut summary, progress.as_ref()),
                    None => break,
                },
            }
        }

        if self.cancel.is_cancelled() {
            summary.cancelled = true;
            printer.notice("Stopping scan...");
            semaphore.close();

            let budget = self.config.collection_timeout();
            let draining = Instant::now();
            while let Ok(Some(joined)) =
                tokio::time::timeout(budget.saturating_sub(draining.elapsed()), tasks.join_next())
                    .await
            {
                Self::collect(joined, &mut pending, &mut summary, progress.as_ref());
            }
            tasks.shutdown().await;

            for host in pending.into_values() {
                warn!(host = %host, "host scan did not finish in time, dropping partial results");
                printer.notice(&format!("Scan for host {} timed out", host));
                summary.timed_out.push(host);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            scanned = summary.hosts_scanned,
            matches = summary.outcomes.len(),
            cancelled = summary.cancelled,
            "scan finished"
        );
        summary
    }

    fn collect(
        joined: Result<TaskOutput, JoinError>,
        pending: &mut BTreeMap<usize, String>,
        summary: &mut ScanSummary,
        progress: Option<&ProgressBar>,
    ) {
        match joined {
            Ok((index, result)) => {
                pending.remove(&index);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                match result {
                    Some(result) => {
                        summary.hosts_scanned += 1;
                        summary.outcomes.extend(result.outcomes);
                    }
                    None => debug!(index, "host withdrawn before scanning"),
                }
            }
            Err(e) => warn!(error = %e, "host task failed"),
        }
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.config.verbose || self.config.quiet {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hosts ({percent}%)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        Some(pb)
    }
}

//! Per-host scanning.
//!
//! Walks the target catalog for one host, probing each entry in order
//! inside the calling worker.

use crate::output::LivePrinter;
use crate::scanner::cancel::CancellationFlag;
use crate::scanner::traits::{ProbeOutcome, Prober};
use crate::types::{normalize_host, CatalogEntry, TARGET_CATALOG};
use std::sync::Arc;
use tracing::{debug, warn};

/// Matched outcomes for one host, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct HostResult {
    /// Normalized host name.
    pub host: String,
    /// Matching outcomes only.
    pub outcomes: Vec<ProbeOutcome>,
}

/// Scans every catalog entry of a single host.
pub struct DomainScanner {
    prober: Arc<dyn Prober>,
    catalog: Vec<CatalogEntry>,
    cancel: CancellationFlag,
    printer: LivePrinter,
}

impl DomainScanner {
    /// Create a scanner over the standard catalog.
    pub fn new(prober: Arc<dyn Prober>, cancel: CancellationFlag) -> Self {
        Self {
            prober,
            catalog: TARGET_CATALOG.to_vec(),
            cancel,
            printer: LivePrinter::default(),
        }
    }

    /// Replace the catalog.
    pub fn with_catalog(mut self, catalog: Vec<CatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set where progress lines go.
    pub fn with_printer(mut self, printer: LivePrinter) -> Self {
        self.printer = printer;
        self
    }

    /// Probe `raw_host` on every catalog entry.
    ///
    /// Stops before the next entry once cancellation is observed; matches
    /// gathered so far are still returned.
    pub async fn scan(&self, raw_host: &str) -> HostResult {
        let host = normalize_host(raw_host);
        let mut result = HostResult {
            host,
            outcomes: Vec::new(),
        };

        if result.host.is_empty() {
            warn!(entry = raw_host, "skipping empty host entry");
            return result;
        }

        for entry in &self.catalog {
            if self.cancel.is_cancelled() {
                debug!(host = %result.host, "cancelled, stopping host scan");
                break;
            }

            let outcome = self.prober.probe(&entry.target(&result.host)).await;
            if outcome.matched {
                self.printer
                    .print_match(&result.host, &outcome, result.outcomes.is_empty());
                result.outcomes.push(outcome);
            }
        }

        debug!(host = %result.host, matches = result.outcomes.len(), "host scan finished");
        result
    }
}

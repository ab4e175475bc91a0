//! # httpscout - Concurrent HTTP Service Discovery
//!
//! httpscout takes a list of host names, probes each one on a fixed catalog
//! of common web ports over HTTP and HTTPS, and reports every response whose
//! status code is worth a closer look.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: A fixed-width pool of hosts, ports probed in order
//! - **Status Taxonomy**: Eleven watched codes, reported in a fixed priority order
//! - **Page Titles**: Extracted from HTML with an encoding fallback chain
//! - **Redirect Targets**: `Location` values resolved against the request URL
//! - **Cooperative Cancellation**: Ctrl+C stops new work and keeps finished results
//! - **Multiple Report Formats**: Plain text, JSON, and CSV, plus a flat URL list
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use httpscout::scanner::{CancellationFlag, HttpProber, ScanJobConfig, ScanOrchestrator};
//! use httpscout::output::ClassifiedReport;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cancel = CancellationFlag::new();
//!     let timeout = Duration::from_secs(5);
//!     let prober = HttpProber::new(timeout, cancel.clone())?;
//!
//!     let summary = ScanOrchestrator::new(Arc::new(prober), ScanJobConfig::new(10, timeout), cancel)
//!         .run(vec!["example.com".to_string()])
//!         .await;
//!
//!     let report = ClassifiedReport::classify(summary.outcomes);
//!     println!("{} matching responses", report.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Targets, the port catalog, and the status taxonomy
//! - [`scanner`] - Probe executor, per-host scanner, and the worker pool
//! - [`output`] - Console lines and report files
//! - [`config`] - Settings file handling
//! - [`cli`] - Command-line subcommands
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ReportError, TargetError};
pub use scanner::{CancellationFlag, ErrorKind, ProbeOutcome, Prober, ScanOrchestrator};
pub use types::{Protocol, Target, TARGET_CATALOG};

//! CLI subcommand definitions and handlers.
//!
//! - `httpscout scan <input>` - Probe every host in a host list
//! - `httpscout catalog` - Show the probed ports and watched status codes

mod catalog;
mod scan;

pub use catalog::CatalogCommand;
pub use scan::ScanCommand;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// httpscout - probe a list of hosts for live web services.
///
/// Every host is tried on a fixed set of common HTTP and HTTPS ports, and
/// responses with interesting status codes are collected into a report.
#[derive(Parser, Debug)]
#[command(name = "httpscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent HTTP service discovery for host lists", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to custom configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe every host in a host list
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Show the probed ports and watched status codes
    #[command(alias = "c")]
    Catalog(CatalogCommand),
}

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Sectioned plain-text report
    #[default]
    Text,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

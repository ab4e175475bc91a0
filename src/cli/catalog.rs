//! Catalog subcommand implementation.

use crate::output::status_style;
use crate::types::{status, TARGET_CATALOG};
use clap::Parser;
use console::style;

/// Show the probed ports and watched status codes.
#[derive(Parser, Debug)]
pub struct CatalogCommand {}

impl CatalogCommand {
    /// Print the catalog, then the status codes in report order.
    pub fn execute(&self) {
        println!("{}", style("Probed ports").cyan().bold());
        for entry in TARGET_CATALOG {
            println!("  {:>5}  {}", entry.port, entry.protocol);
        }

        println!();
        println!("{}", style("Watched status codes (report order)").cyan().bold());
        for code in status::PRIORITY_ORDER {
            println!(
                "  {}  {}",
                status_style(code).apply_to(code),
                status::description(code).unwrap_or_default()
            );
        }
    }
}

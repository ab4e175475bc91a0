//! Core type definitions: probe targets, the port catalog, and the status
//! taxonomy.

mod catalog;
pub mod status;
mod target;

pub use catalog::{CatalogEntry, TARGET_CATALOG};
pub use target::{normalize_host, read_host_list, Protocol, Target, TargetError};

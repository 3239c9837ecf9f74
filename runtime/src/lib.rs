//! Please Runtime - package catalog engine.
//!
//! This crate provides streaming search over compressed manifest catalogs
//! and registry-backed discovery of package versions.

#![allow(clippy::result_large_err)]

pub mod catalog;
pub mod registry;

// Re-export common types
pub use catalog::{CatalogFile, ManifestDecoder};
pub use catalog::{CatalogSearch, SearchFailure, SearchMode, SearchResults};
pub use catalog::{FuzzyMatch, ManifestArchive, ScriptHooks};
pub use registry::RegistryVersionClient;

/// Please Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

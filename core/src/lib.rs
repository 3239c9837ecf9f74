//! Please Core - Foundational Types and Abstractions
//!
//! This module provides the package manifest model, the error taxonomy and
//! the configuration shared by the catalog, registry and CLI crates.

pub mod config;
pub mod error;
pub mod manifest;

// Re-export commonly used types
pub use config::{PleaseConfig, RegistryConfig};
pub use error::{PleaseError, Result};
pub use manifest::{ContainerArgs, PackageManifest, VersionDiscovery, VersionFilter};

/// Please version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

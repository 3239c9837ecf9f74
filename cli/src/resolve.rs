//! Package identifier resolution.
//!
//! Identifiers take the forms `namespace:package:version`,
//! `package:version` or `package`. A missing namespace falls back to the
//! configured default.

use std::fmt;
use std::path::PathBuf;

use please_core::PleaseConfig;

/// A parsed package identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId {
    pub namespace: String,
    pub name: String,
    pub version: Option<String>,
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

/// Parse `input` into a package identifier.
pub fn parse_identifier(input: &str, default_namespace: &str) -> Result<PackageId, ResolveError> {
    let parts: Vec<&str> = input.split(':').collect();
    let (namespace, name, version) = match parts.as_slice() {
        [name] => (default_namespace, *name, None),
        [name, version] => (default_namespace, *name, Some(*version)),
        [namespace, name, version] => (*namespace, *name, Some(*version)),
        _ => return Err(ResolveError::Malformed(input.to_string())),
    };

    if name.is_empty() || namespace.is_empty() {
        return Err(ResolveError::Malformed(input.to_string()));
    }

    Ok(PackageId {
        namespace: namespace.to_string(),
        name: name.to_string(),
        version: version.filter(|v| !v.is_empty()).map(str::to_string),
    })
}

/// Archive to read for `id`: an explicit override, else the namespace's archive.
pub fn archive_path(config: &PleaseConfig, id: &PackageId, archive: Option<PathBuf>) -> PathBuf {
    archive.unwrap_or_else(|| config.manifest_path(&id.namespace))
}

/// The host platform in manifest notation (e.g., "linux/amd64").
pub fn local_platform() -> String {
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    };
    format!("{}/{}", std::env::consts::OS, arch)
}

/// Resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid package identifier \"{0}\" (expected [namespace:]package[:version])")]
    Malformed(String),
}

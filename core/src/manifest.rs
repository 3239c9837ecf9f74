//! Package manifest model.
//!
//! A manifest describes one installable, containerized command-line tool as
//! it appears inside a catalog archive. Unknown JSON fields are ignored and
//! every field falls back to its empty value when absent.

use serde::{Deserialize, Serialize};

/// One installable package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    /// Unique key within a namespace
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub license: String,
    pub categories: Vec<String>,
    /// Image reference (e.g., "python", "ghcr.io/org/tool")
    pub image: String,

    /// Static version list. Takes precedence over `version_discovery`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
    /// Registry-backed version discovery rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_discovery: Option<VersionDiscovery>,

    pub default_version: String,
    /// Script kind used to wrap the container (e.g., "standard")
    pub script: String,
    pub platforms: Vec<String>,
    pub application_args: Vec<String>,
    pub container_args: ContainerArgs,
}

impl PackageManifest {
    /// The static version list, if one is declared and non-empty.
    pub fn static_versions(&self) -> Option<&[String]> {
        self.versions
            .as_deref()
            .filter(|versions| !versions.is_empty())
    }

    /// Whether versions must be discovered from the registry.
    ///
    /// A static list always wins when both are present.
    pub fn uses_version_discovery(&self) -> bool {
        self.static_versions().is_none() && self.version_discovery.is_some()
    }

    /// Pick the platform to run on: `local` if supported, else the first declared one.
    pub fn select_platform(&self, local: &str) -> Option<&str> {
        self.platforms
            .iter()
            .find(|p| p.as_str() == local)
            .or_else(|| self.platforms.first())
            .map(String::as_str)
    }
}

/// Arguments passed to the container runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerArgs {
    pub dns: Vec<String>,
    pub workdir: String,
    pub volumes: Vec<String>,
    pub additional_flags: Vec<String>,
}

/// Version discovery rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionDiscovery {
    pub filter: VersionFilter,
}

/// Tag filter applied to a registry tag list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionFilter {
    /// Inclusion regex (e.g., `^[0-9]+\.[0-9]+\.[0-9]+$`). Empty means "match all".
    pub pattern: String,
    /// Literal tags to drop (e.g., `["latest", "edge"]`).
    pub exclude: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_manifest() {
        let json = r#"{
            "name": "python",
            "description": "Python interpreter",
            "homepage": "https://python.org",
            "license": "PSF",
            "categories": ["language"],
            "image": "python",
            "version_discovery": {
                "filter": {"pattern": "^[0-9]+\\.[0-9]+$", "exclude": ["latest"]}
            },
            "default_version": "3.12",
            "script": "standard",
            "platforms": ["linux/arm64", "linux/amd64"],
            "application_args": ["python3"],
            "container_args": {
                "dns": ["1.1.1.1"],
                "workdir": "/work",
                "volumes": ["$PWD:/work"],
                "additional_flags": ["--rm"]
            },
            "maintainer": "ignored"
        }"#;

        let manifest: PackageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.name, "python");
        assert_eq!(manifest.categories, vec!["language"]);
        assert!(manifest.versions.is_none());
        let discovery = manifest.version_discovery.as_ref().unwrap();
        assert_eq!(discovery.filter.exclude, vec!["latest"]);
        assert_eq!(manifest.container_args.workdir, "/work");
        assert_eq!(manifest.container_args.additional_flags, vec!["--rm"]);
        assert!(manifest.uses_version_discovery());
    }

    #[test]
    fn test_deserialize_minimal_manifest() {
        let manifest: PackageManifest = serde_json::from_str(r#"{"name": "jq"}"#).unwrap();
        assert_eq!(manifest.name, "jq");
        assert!(manifest.image.is_empty());
        assert!(manifest.version_discovery.is_none());
        assert_eq!(manifest.container_args, ContainerArgs::default());
    }

    #[test]
    fn test_static_versions_take_precedence() {
        let manifest = PackageManifest {
            name: "node".to_string(),
            versions: Some(vec!["20".to_string(), "22".to_string()]),
            version_discovery: Some(VersionDiscovery::default()),
            ..Default::default()
        };
        assert_eq!(manifest.static_versions().unwrap().len(), 2);
        assert!(!manifest.uses_version_discovery());
    }

    #[test]
    fn test_empty_static_list_defers_to_discovery() {
        let manifest = PackageManifest {
            versions: Some(vec![]),
            version_discovery: Some(VersionDiscovery::default()),
            ..Default::default()
        };
        assert!(manifest.static_versions().is_none());
        assert!(manifest.uses_version_discovery());
    }

    #[test]
    fn test_select_platform() {
        let manifest = PackageManifest {
            platforms: vec!["linux/amd64".to_string(), "linux/arm64".to_string()],
            ..Default::default()
        };
        assert_eq!(manifest.select_platform("linux/arm64"), Some("linux/arm64"));
        assert_eq!(manifest.select_platform("linux/riscv64"), Some("linux/amd64"));
        assert_eq!(PackageManifest::default().select_platform("linux/arm64"), None);
    }
}

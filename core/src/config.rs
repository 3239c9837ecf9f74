use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PleaseError, Result};

/// Environment variable overriding the Please home directory.
pub const HOME_ENV: &str = "PLEASE_HOME";

/// Default fuzzy search result cap.
pub const DEFAULT_FUZZY_MAX_RESULTS: usize = 10;

/// Please configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PleaseConfig {
    /// Root directory (~/.please)
    pub home: PathBuf,

    /// Namespace assumed when an identifier omits one
    pub default_namespace: String,

    /// Maximum number of fuzzy search candidates per archive
    pub fuzzy_max_results: usize,

    /// Registry version discovery configuration
    pub registry: RegistryConfig,
}

impl Default for PleaseConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            default_namespace: "core".to_string(),
            fuzzy_max_results: DEFAULT_FUZZY_MAX_RESULTS,
            registry: RegistryConfig::default(),
        }
    }
}

impl PleaseConfig {
    /// Load configuration from the home directory resolved from `PLEASE_HOME`
    /// or `~/.please`.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_home())
    }

    /// Load `config.json` from `home`, falling back to defaults when absent.
    ///
    /// The returned config always points at `home`, whatever the file says.
    pub fn load_from(home: &Path) -> Result<Self> {
        let path = home.join("config.json");
        let mut config = if path.exists() {
            let data = std::fs::read_to_string(&path).map_err(|e| {
                PleaseError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str::<PleaseConfig>(&data).map_err(|e| {
                PleaseError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            PleaseConfig::default()
        };
        config.home = home.to_path_buf();

        tracing::debug!(home = %config.home.display(), "Loaded configuration");
        Ok(config)
    }

    /// Directory holding the catalog archives.
    pub fn manifests_dir(&self) -> PathBuf {
        self.home.join("manifests")
    }

    /// Path of the archive holding `namespace`.
    pub fn manifest_path(&self, namespace: &str) -> PathBuf {
        self.manifests_dir()
            .join(format!("manifest-{}.tar.gz", namespace))
    }

    /// List every `*.tar.gz` catalog archive, sorted by path.
    pub fn manifest_paths(&self) -> Result<Vec<PathBuf>> {
        let dir = self.manifests_dir();
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            PleaseError::ConfigError(format!(
                "Failed to read manifest directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let is_archive = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(".tar.gz"));
            if is_archive && path.is_file() {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(PleaseError::ConfigError(
                "No manifest files found. Please run 'please update'.".to_string(),
            ));
        }

        paths.sort();
        Ok(paths)
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// URL scheme used for registry API calls
    pub scheme: String,

    /// Docker Hub token endpoint
    pub auth_url: String,

    /// Service name sent to the token endpoint
    pub auth_service: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            auth_url: "https://auth.docker.io/token".to_string(),
            auth_service: "registry.docker.io".to_string(),
            timeout_secs: 30,
        }
    }
}

fn default_home() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .map(|h| h.join(".please"))
        .unwrap_or_else(|| PathBuf::from(".please"))
}

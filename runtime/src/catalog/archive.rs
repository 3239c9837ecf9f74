//! Whole-catalog operations over a manifest archive.
//!
//! Every operation opens the archive afresh and makes one sequential pass,
//! stopping as soon as it has what it needs. Handles are released when the
//! pass ends, whether it returns normally, stops early, or fails.

use std::io::Read;
use std::path::{Path, PathBuf};

use please_core::error::{PleaseError, Result};
use please_core::manifest::PackageManifest;

use super::decoder::{corrupt, CatalogFile, ManifestDecoder};
use super::fuzzy;

/// Archive directory holding install hooks.
const HOOKS_DIR: &str = "hooks/";

/// A fuzzy search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub manifest: PackageManifest,
    /// Edit distance between the query and `manifest.name`.
    pub distance: usize,
}

/// Install hooks for one package. An empty body means "no-op".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptHooks {
    pub pre_hook: String,
    pub post_hook: String,
}

impl ScriptHooks {
    pub fn is_empty(&self) -> bool {
        self.pre_hook.is_empty() && self.post_hook.is_empty()
    }
}

/// A read-only manifest catalog on disk.
#[derive(Debug, Clone)]
pub struct ManifestArchive {
    path: PathBuf,
    namespace: String,
    count: usize,
}

impl ManifestArchive {
    /// Open an archive, reading its namespace and counting its manifests.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut catalog = CatalogFile::open(&path)?;
        let mut decoder = catalog.manifests()?;
        let namespace = match decoder.namespace() {
            "" => namespace_from_file_name(&path),
            declared => declared.to_string(),
        };

        let mut count = 0;
        while decoder.decode_next()?.is_some() {
            count += 1;
        }

        tracing::debug!(
            path = %path.display(),
            namespace = %namespace,
            count,
            "Indexed manifest archive"
        );

        Ok(Self {
            path,
            namespace,
            count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Namespace label from the archive header.
    ///
    /// Bare-array catalogs take it from a `manifest-<namespace>.tar.gz` file
    /// name instead, and have none otherwise.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of manifests in the archive.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Run `f` against a freshly opened decoder.
    fn with_decoder<T>(&self, f: impl FnOnce(&mut ManifestDecoder<'_>) -> Result<T>) -> Result<T> {
        let mut catalog = CatalogFile::open(&self.path)?;
        let mut decoder = catalog.manifests()?;
        f(&mut decoder)
    }

    /// Return the first manifest named exactly `name` (case-sensitive).
    pub fn exact_match(&self, name: &str) -> Result<PackageManifest> {
        self.with_decoder(|decoder| {
            for manifest in decoder {
                let manifest = manifest?;
                if manifest.name == name {
                    return Ok(manifest);
                }
            }
            Err(PleaseError::NotFound {
                name: name.to_string(),
            })
        })
    }

    /// Find manifests whose names are within edit distance of `query`.
    ///
    /// The pass stops once `max_results` candidates have been collected, so a
    /// closer match later in the archive is not considered. Results are sorted
    /// by ascending distance; ties keep archive order.
    pub fn fuzzy_search(&self, query: &str, max_results: usize) -> Result<Vec<FuzzyMatch>> {
        let bound = fuzzy::max_distance(query);

        let mut candidates = self.with_decoder(|decoder| {
            let mut candidates = Vec::new();
            while candidates.len() < max_results {
                let Some(manifest) = decoder.decode_next()? else {
                    break;
                };
                if let Some(distance) = fuzzy::distance_within(query, &manifest.name, bound) {
                    tracing::trace!(name = %manifest.name, distance, "Fuzzy candidate");
                    candidates.push(FuzzyMatch { manifest, distance });
                }
            }
            Ok(candidates)
        })?;

        candidates.sort_by_key(|c| c.distance);

        tracing::debug!(
            query = %query,
            path = %self.path.display(),
            results = candidates.len(),
            "Fuzzy search complete"
        );
        Ok(candidates)
    }

    /// Load `hooks/<name>_prehook.sh` and `hooks/<name>_posthook.sh`.
    ///
    /// Missing hooks are left empty. A later copy of a hook replaces an
    /// earlier one, and scanning stops once both hooks have been seen.
    pub fn load_script_hooks(&self, package_name: &str) -> Result<ScriptHooks> {
        let pre_name = format!("{}_prehook.sh", package_name);
        let post_name = format!("{}_posthook.sh", package_name);

        let mut catalog = CatalogFile::open(&self.path)?;
        let path = catalog.path().to_path_buf();
        let entries = catalog.entries()?;

        let mut hooks = ScriptHooks::default();
        let (mut pre_found, mut post_found) = (false, false);

        for entry in entries {
            let mut entry =
                entry.map_err(|e| corrupt(&path, format!("failed to read tar entry: {}", e)))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let member = entry
                .path()
                .map_err(|e| corrupt(&path, format!("invalid entry path: {}", e)))?
                .to_string_lossy()
                .into_owned();
            let Some(file_name) = member.strip_prefix(HOOKS_DIR) else {
                continue;
            };

            let slot = if file_name == pre_name {
                pre_found = true;
                &mut hooks.pre_hook
            } else if file_name == post_name {
                post_found = true;
                &mut hooks.post_hook
            } else {
                continue;
            };

            slot.clear();
            entry
                .read_to_string(slot)
                .map_err(|e| corrupt(&path, format!("failed to read {}: {}", member, e)))?;

            if pre_found && post_found {
                break;
            }
        }

        tracing::debug!(
            package = %package_name,
            pre_hook = pre_found,
            post_hook = post_found,
            "Loaded script hooks"
        );
        Ok(hooks)
    }
}

/// `manifest-extra.tar.gz` -> `extra`
fn namespace_from_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("manifest-"))
        .and_then(|n| n.strip_suffix(".tar.gz"))
        .unwrap_or_default()
        .to_string()
}

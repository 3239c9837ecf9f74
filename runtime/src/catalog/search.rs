//! Concurrent search across every installed catalog.
//!
//! One blocking worker per archive, each with its own `ManifestArchive`.
//! Results are merged per namespace behind a single lock; a failing archive
//! is recorded and the others still report.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use please_core::error::{PleaseError, Result};
use please_core::manifest::PackageManifest;

use super::archive::ManifestArchive;

/// How a query is matched against package names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Exact,
    Fuzzy { max_results: usize },
}

/// One archive that could not be searched.
#[derive(Debug)]
pub struct SearchFailure {
    pub path: PathBuf,
    pub error: PleaseError,
}

/// Merged results of a fan-out search.
#[derive(Debug, Default)]
pub struct SearchResults {
    /// Matches keyed by namespace.
    pub by_namespace: BTreeMap<String, Vec<PackageManifest>>,
    pub failures: Vec<SearchFailure>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.by_namespace.values().all(Vec::is_empty)
    }

    /// Namespaces with `preferred` first, the rest alphabetically.
    pub fn ordered_namespaces(&self, preferred: &str) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.by_namespace.keys().map(String::as_str).collect();
        namespaces.sort_by_key(|ns| (*ns != preferred, *ns));
        namespaces
    }
}

/// Fans a query out to a set of catalog archives.
pub struct CatalogSearch {
    paths: Vec<PathBuf>,
}

impl CatalogSearch {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Search every archive concurrently and merge the results.
    pub async fn search(&self, query: &str, mode: SearchMode) -> SearchResults {
        let results = Arc::new(Mutex::new(SearchResults::default()));

        let workers = self.paths.iter().cloned().map(|path| {
            let results = Arc::clone(&results);
            let query = query.to_string();
            async move {
                let worker_path = path.clone();
                let outcome =
                    tokio::task::spawn_blocking(move || search_archive(&worker_path, &query, mode))
                        .await
                        .unwrap_or_else(|e| {
                            Err(PleaseError::Other(format!("search worker failed: {}", e)))
                        });

                let mut merged = results.lock();
                match outcome {
                    Ok((namespace, found)) => {
                        if !found.is_empty() {
                            merged.by_namespace.entry(namespace).or_default().extend(found);
                        }
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), error = %error, "Catalog search failed");
                        merged.failures.push(SearchFailure { path, error });
                    }
                }
            }
        });
        futures::future::join_all(workers).await;

        let mut merged = std::mem::take(&mut *results.lock());
        merged.failures.sort_by(|a, b| a.path.cmp(&b.path));
        merged
    }
}

fn search_archive(
    path: &std::path::Path,
    query: &str,
    mode: SearchMode,
) -> Result<(String, Vec<PackageManifest>)> {
    let archive = ManifestArchive::open(path)?;
    let found = match mode {
        SearchMode::Exact => match archive.exact_match(query) {
            Ok(manifest) => vec![manifest],
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        },
        SearchMode::Fuzzy { max_results } => archive
            .fuzzy_search(query, max_results)?
            .into_iter()
            .map(|m| m.manifest)
            .collect(),
    };
    Ok((archive.namespace().to_string(), found))
}

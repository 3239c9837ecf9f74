//! Tag filtering and version ordering.
//!
//! Ordering is a best-effort numeric comparison of dotted components, not
//! SemVer: pre-release and build metadata are not understood, so `1.2.1-rc1`
//! compares equal to `1.2.0` because `1-rc1` is not a number.

use std::cmp::Ordering;
use std::collections::HashSet;

use please_core::error::{PleaseError, Result};
use please_core::manifest::VersionFilter;
use regex::Regex;

/// Compare two version strings as numeric tuples.
///
/// A single leading `v` is ignored. Components are split on `.`; a missing
/// or non-numeric component counts as 0.
pub(crate) fn compare_versions(a: &str, b: &str) -> Ordering {
    let a: Vec<&str> = a.strip_prefix('v').unwrap_or(a).split('.').collect();
    let b: Vec<&str> = b.strip_prefix('v').unwrap_or(b).split('.').collect();

    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).map_or(0, |c| component(c));
        let y = b.get(i).map_or(0, |c| component(c));
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn component(s: &str) -> i64 {
    s.parse().unwrap_or(0)
}

/// Apply `filter` to `tags` and order the survivors newest first.
///
/// Excluded tags are dropped by exact match; when a pattern is set, tags
/// that do not match it are dropped too. Equal versions keep input order.
pub(crate) fn filter_versions(tags: Vec<String>, filter: &VersionFilter) -> Result<Vec<String>> {
    let pattern = if filter.pattern.is_empty() {
        None
    } else {
        Some(
            Regex::new(&filter.pattern).map_err(|e| PleaseError::PatternError {
                pattern: filter.pattern.clone(),
                message: e.to_string(),
            })?,
        )
    };
    let exclude: HashSet<&str> = filter.exclude.iter().map(String::as_str).collect();

    let mut versions: Vec<String> = tags
        .into_iter()
        .filter(|tag| !exclude.contains(tag.as_str()))
        .filter(|tag| pattern.as_ref().map_or(true, |re| re.is_match(tag)))
        .collect();

    versions.sort_by(|a, b| compare_versions(b, a));
    Ok(versions)
}

//! Typo-tolerant name matching.

/// Maximum edit distance tolerated for `query`: 30% of its byte length,
/// floored, but never below 1.
pub(crate) fn max_distance(query: &str) -> usize {
    (query.len() * 3 / 10).max(1)
}

/// Character-level edit distance from `query` to `name`, if within `bound`.
pub(crate) fn distance_within(query: &str, name: &str, bound: usize) -> Option<usize> {
    Some(strsim::levenshtein(query, name)).filter(|d| *d <= bound)
}

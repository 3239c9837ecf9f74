//! Table formatting helpers for CLI output.

use comfy_table::{ContentArrangement, Table};
use please_core::PackageManifest;

/// Longest description shown in list views before truncation.
pub const DESCRIPTION_WIDTH: usize = 60;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Create a header-less two-column table of `Key:` / value rows.
pub fn key_value_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    for (key, value) in rows {
        table.add_row(vec![format!("{key}:"), value.clone()]);
    }
    table
}

/// Detail rows for `show`.
pub fn manifest_rows(manifest: &PackageManifest) -> Vec<(&'static str, String)> {
    vec![
        ("Name", manifest.name.clone()),
        ("Description", manifest.description.clone()),
        ("Homepage", manifest.homepage.clone()),
        ("License", manifest.license.clone()),
        ("Categories", manifest.categories.join(", ")),
        ("Image", manifest.image.clone()),
        ("Platforms", manifest.platforms.join(", ")),
        ("Versions", format_versions(manifest)),
    ]
}

/// The static version list, or `auto-discover` when versions come from the registry.
pub fn format_versions(manifest: &PackageManifest) -> String {
    match manifest.static_versions() {
        Some(versions) => versions.join(", "),
        None => "auto-discover".to_string(),
    }
}

/// Shorten `s` to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

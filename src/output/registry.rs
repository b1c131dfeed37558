//! Registry listing and info display

use crate::model::Registry;
use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;

/// Formats the summary of one registry snapshot
pub fn format_registry_info(path: &Path, registry: &Registry, list_titles: bool) -> String {
    let mut out = String::new();

    out.push_str("Registry Information:\n");
    out.push_str(&format!("  File: {}\n", path.display()));
    out.push_str(&format!("  Code Type: {}\n", registry.code_type));
    out.push_str(&format!("  Created: {}\n", registry.created_at));
    out.push_str(&format!("  Base URL: {}\n", registry.base_url));
    out.push_str(&format!("  Titles: {}\n", registry.titles.len()));
    out.push_str(&format!("  Total Chapters: {}\n", registry.chapter_count()));
    out.push_str(&format!("  Total Sections: {}\n", registry.section_count()));

    if list_titles {
        out.push_str("\nTitles:\n");
        for title in &registry.titles {
            out.push_str(&format!(
                "  {}: {} ({} chapters)\n",
                title.title_number,
                title.name,
                title.chapters.len()
            ));
        }
    }

    out
}

/// Formats one line of a registry listing
pub fn format_listing_line(path: &Path, modified: SystemTime) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let modified: DateTime<Local> = modified.into();
    format!(
        "  {} (modified: {})",
        name,
        modified.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn print_registry_info(path: &Path, registry: &Registry, list_titles: bool) {
    print!("{}", format_registry_info(path, registry, list_titles));
}

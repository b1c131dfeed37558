//! Content store statistics display

use crate::model::{CodeType, NodeKind};
use crate::storage::ContentStats;

/// Formats content statistics for the terminal
pub fn format_content_stats(stats: &ContentStats, code_type: Option<CodeType>) -> String {
    let mut out = String::new();

    out.push_str("=== Content Statistics ===\n\n");

    if let Some(code) = code_type {
        out.push_str(&format!("Code type: {}\n", code));
        out.push_str(&format!("Total files: {}\n\n", stats.count_for(code)));
        out.push_str("By kind:\n");
        for kind in NodeKind::all() {
            out.push_str(&format!("  {}: {}\n", kind, stats.count_of_in(code, kind)));
        }
        return out;
    }

    out.push_str(&format!("Total files: {}\n\n", stats.total_files));

    out.push_str("By code type:\n");
    for code in CodeType::all() {
        out.push_str(&format!("  {}: {}\n", code, stats.count_for(code)));
    }
    out.push('\n');

    out.push_str("By kind:\n");
    for kind in NodeKind::all() {
        out.push_str(&format!("  {}: {}\n", kind, stats.count_of(kind)));
    }

    out
}

/// Prints content statistics to stdout
pub fn print_content_stats(stats: &ContentStats, code_type: Option<CodeType>) {
    print!("{}", format_content_stats(stats, code_type));
}

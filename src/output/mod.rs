//! Output module for terminal reports
//!
//! This module formats registry listings, registry summaries, and content
//! store statistics for the command-line front end.

mod registry;
mod stats;

pub use registry::{format_listing_line, format_registry_info, print_registry_info};
pub use stats::{format_content_stats, print_content_stats};

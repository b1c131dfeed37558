//! Observer capability for crawl and content-scrape events
//!
//! Components receive an observer instead of writing to ambient logging
//! state. `TracingObserver` forwards everything to `tracing`.

use crate::model::{Coordinate, NodeKind};
use crate::FetchError;
use std::fmt;
use std::path::Path;

/// The kind of page a request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A code's top-level index of titles
    Index,
    Node(NodeKind),
}

impl From<NodeKind> for PageKind {
    fn from(kind: NodeKind) -> Self {
        Self::Node(kind)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("index"),
            Self::Node(kind) => write!(f, "{}", kind),
        }
    }
}

/// A node whose children or content could not be fetched
///
/// Distinguishes "could not be fetched" from "has no children".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absent {
    pub kind: PageKind,
    /// Citation number of the node, or the code type for an index page
    pub number: String,
    pub url: String,
    pub reason: String,
}

impl Absent {
    pub fn new(kind: impl Into<PageKind>, number: impl Into<String>, error: &FetchError) -> Self {
        Self {
            kind: kind.into(),
            number: number.into(),
            url: error.url().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Receives progress events. Every method has a no-op default.
pub trait CrawlObserver {
    /// Children of a node were extracted
    fn children_found(&self, _parent: NodeKind, _number: &str, _child: NodeKind, _count: usize) {}

    /// A node's page could not be fetched; it is left without children or content
    fn node_unavailable(&self, _absent: &Absent) {}

    /// A duplicate child number was dropped
    fn duplicate_dropped(&self, _child: NodeKind, _number: &str) {}

    /// Content for a coordinate was written
    fn content_saved(&self, _coordinate: &Coordinate, _path: &Path) {}

    /// Content for a coordinate already existed and was not fetched
    fn content_skipped(&self, _coordinate: &Coordinate) {}
}

/// Observer that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn children_found(&self, parent: NodeKind, number: &str, child: NodeKind, count: usize) {
        tracing::info!("Found {} {}s for {} {}", count, child, parent, number);
    }

    fn node_unavailable(&self, absent: &Absent) {
        tracing::error!(
            "Failed to fetch {} page for {}: {}",
            absent.kind,
            absent.number,
            absent.reason
        );
    }

    fn duplicate_dropped(&self, child: NodeKind, number: &str) {
        tracing::debug!("Dropping duplicate {} {}", child, number);
    }

    fn content_saved(&self, coordinate: &Coordinate, path: &Path) {
        tracing::debug!("Saved {} to {}", coordinate, path.display());
    }

    fn content_skipped(&self, coordinate: &Coordinate) {
        tracing::debug!("Skipping existing content for {}", coordinate);
    }
}

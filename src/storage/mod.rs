//! Storage module for persisting crawl results
//!
//! This module handles all filesystem persistence, including:
//! - Registry snapshots (one immutable YAML file per crawl)
//! - Raw document content addressed by hierarchy coordinate
//!
//! All writers are assumed to be a single process; no file locking is done.

mod content;
mod registry;
mod traits;

pub use content::{ContentStats, ContentStore};
pub use registry::{RegistryStore, REGISTRY_EXTENSION};
pub use traits::{StoreError, StoreResult};

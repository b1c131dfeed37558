//! WA Law Scraper: registry and content store for Washington State legal codes
//!
//! This crate crawls the WAC and RCW index pages into a Title → Chapter → Section
//! tree, snapshots that tree to disk, and fetches the raw document behind every
//! node into a resumable content store.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("No titles discovered for {code_type} at {url}")]
    NoTitles { code_type: model::CodeType, url: String },

    #[error("No registry found for {0}")]
    NoRegistry(model::CodeType),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport-level failures. Always recoverable at the node level.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose request failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url } | Self::Status { url, .. } | Self::Http { url, .. } => url,
        }
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Chapter, CodeType, Coordinate, NodeKind, Registry, Section, Title};
pub use storage::{ContentStore, RegistryStore};

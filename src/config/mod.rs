//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional; `Config::default()` describes the live sources.
//!
//! # Example
//!
//! ```no_run
//! use wa_law_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Rate limiting: {}", config.fetcher.rate_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, SourcesConfig, StorageConfig, DEFAULT_RCW_URL, DEFAULT_USER_AGENT,
    DEFAULT_WAC_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

use crate::model::CodeType;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_WAC_URL: &str = "https://app.leg.wa.gov/wac/default.aspx";
pub const DEFAULT_RCW_URL: &str = "https://app.leg.wa.gov/RCW/default.aspx";
pub const DEFAULT_USER_AGENT: &str = "WA-Law-Scraper/1.0 (Educational/Research Purpose)";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Page fetcher behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Sleep a fixed delay before every request
    #[serde(rename = "rate-limit", default)]
    pub rate_limit: bool,

    /// Delay between requests when rate limiting is enabled (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Present a browser User-Agent instead of the static identity
    #[serde(rename = "spoof-user-agent", default = "default_true")]
    pub spoof_user_agent: bool,

    /// Identity used when spoofing is off or the browser profile fails
    #[serde(rename = "fallback-user-agent", default = "default_user_agent")]
    pub fallback_user_agent: String,
}

/// On-disk layout
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of registry snapshots and stored content
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Extension of stored content files
    #[serde(rename = "content-extension", default = "default_extension")]
    pub content_extension: String,
}

/// Index page of each legal code
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(rename = "wac-url", default = "default_wac_url")]
    pub wac_url: String,

    #[serde(rename = "rcw-url", default = "default_rcw_url")]
    pub rcw_url: String,
}

impl SourcesConfig {
    /// Index URL for a code type
    pub fn url_for(&self, code_type: CodeType) -> &str {
        match code_type {
            CodeType::Wac => &self.wac_url,
            CodeType::Rcw => &self.rcw_url,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            rate_limit: false,
            delay_ms: default_delay_ms(),
            spoof_user_agent: true,
            fallback_user_agent: default_user_agent(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_extension: default_extension(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            wac_url: default_wac_url(),
            rcw_url: default_rcw_url(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extension() -> String {
    "html".to_string()
}

fn default_wac_url() -> String {
    DEFAULT_WAC_URL.to_string()
}

fn default_rcw_url() -> String {
    DEFAULT_RCW_URL.to_string()
}

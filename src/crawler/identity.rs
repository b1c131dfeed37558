//! Identity header providers
//!
//! The fetcher presents a single `User-Agent` header. Where that string comes
//! from is pluggable: a fixed identity, or a browser profile looked up in a
//! built-in catalog of real browser strings.

use thiserror::Error;

/// Errors raised by an identity provider
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("No browser identity for {browser} on {os} ({platform})")]
    UnknownProfile {
        os: String,
        platform: String,
        browser: String,
    },
}

/// Source of the identity header sent with every request
pub trait IdentityProvider {
    /// Returns the `User-Agent` value to send
    fn identity_header(&self) -> Result<String, IdentityError>;
}

/// A fixed identity string
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl IdentityProvider for StaticIdentity {
    fn identity_header(&self) -> Result<String, IdentityError> {
        Ok(self.0.clone())
    }
}

/// Browser identity chosen by operating system, platform, and browser
#[derive(Debug, Clone)]
pub struct BrowserIdentity {
    pub os: String,
    pub platform: String,
    pub browser: String,
}

/// (os, platform, browser, user agent)
const BROWSER_CATALOG: &[(&str, &str, &str, &str)] = &[
    (
        "macos",
        "mobile",
        "safari",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
    ),
    (
        "macos",
        "pc",
        "safari",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    ),
    (
        "macos",
        "pc",
        "chrome",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    (
        "windows",
        "pc",
        "chrome",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    (
        "windows",
        "pc",
        "edge",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.2592.87",
    ),
    (
        "windows",
        "pc",
        "firefox",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    ),
    (
        "linux",
        "pc",
        "firefox",
        "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    ),
    (
        "linux",
        "pc",
        "chrome",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
];

impl BrowserIdentity {
    pub fn new(os: &str, platform: &str, browser: &str) -> Self {
        Self {
            os: os.to_string(),
            platform: platform.to_string(),
            browser: browser.to_string(),
        }
    }
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self::new("macos", "mobile", "safari")
    }
}

impl IdentityProvider for BrowserIdentity {
    fn identity_header(&self) -> Result<String, IdentityError> {
        BROWSER_CATALOG
            .iter()
            .find(|(os, platform, browser, _)| {
                os.eq_ignore_ascii_case(&self.os)
                    && platform.eq_ignore_ascii_case(&self.platform)
                    && browser.eq_ignore_ascii_case(&self.browser)
            })
            .map(|(_, _, _, agent)| agent.to_string())
            .ok_or_else(|| IdentityError::UnknownProfile {
                os: self.os.clone(),
                platform: self.platform.clone(),
                browser: self.browser.clone(),
            })
    }
}

/// Resolves the identity header, falling back to a static string on failure
pub fn resolve_user_agent(provider: &dyn IdentityProvider, fallback: &str) -> String {
    match provider.identity_header() {
        Ok(agent) => {
            tracing::info!("Using user agent: {}", agent);
            agent
        }
        Err(e) => {
            tracing::warn!("Identity provider failed, falling back to default: {}", e);
            fallback.to_string()
        }
    }
}

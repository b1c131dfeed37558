//! Crawler module for index discovery and content retrieval
//!
//! This module contains the network-facing logic, including:
//! - HTTP fetching with an optional fixed delay
//! - Identity header resolution
//! - Citation-based hierarchy extraction
//! - Tree construction and registry generation
//! - Content scraping over a loaded registry

mod content;
mod coordinator;
mod extractor;
mod fetcher;
mod identity;
mod observer;

pub use content::{ContentScraper, ScrapeSummary, TitleScrape};
pub use coordinator::{Crawler, Expansion, GenerationReport, RegistryGenerator};
pub use extractor::{
    citation_token, extract_chapters, extract_links, extract_sections, extract_titles,
    CitationMatcher, CitationPattern, Dialect, ExtractedLink,
};
pub use fetcher::{build_http_client, PageFetcher, PageSource, FETCH_TIMEOUT};
pub use identity::{
    resolve_user_agent, BrowserIdentity, IdentityError, IdentityProvider, StaticIdentity,
};
pub use observer::{Absent, CrawlObserver, PageKind, TracingObserver};

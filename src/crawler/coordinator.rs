//! Crawl coordination
//!
//! This module walks a code's index pages depth-first to build its tree:
//! - One request for the index page, producing titles
//! - One request per title, producing chapters
//! - One request per chapter, producing sections
//!
//! Requests are strictly sequential. A failed index fetch is fatal for that
//! code type; a failed title or chapter fetch leaves that node without
//! children and is reported as an `Absent` gap.

use crate::config::SourcesConfig;
use crate::crawler::extractor::{extract_chapters, extract_sections, extract_titles};
use crate::crawler::fetcher::PageSource;
use crate::crawler::observer::{Absent, CrawlObserver, PageKind, TracingObserver};
use crate::model::{Chapter, CodeType, NodeKind, Registry, Section, Title};
use crate::storage::RegistryStore;
use crate::ScraperError;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// A node together with the gaps left while expanding it
#[derive(Debug, Clone)]
pub struct Expansion<T> {
    pub node: T,
    pub gaps: Vec<Absent>,
}

impl<T> Expansion<T> {
    /// True if every page below this node was fetched
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Builds legal code trees from index pages
pub struct Crawler<S> {
    source: S,
    observer: Arc<dyn CrawlObserver>,
}

impl<S: PageSource> Crawler<S> {
    /// Creates a crawler that reports through `tracing`
    pub fn new(source: S) -> Self {
        Self::with_observer(source, Arc::new(TracingObserver))
    }

    pub fn with_observer(source: S, observer: Arc<dyn CrawlObserver>) -> Self {
        Self { source, observer }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches a code's index page and extracts its titles
    pub async fn discover_titles(
        &self,
        base_url: &str,
        code_type: CodeType,
    ) -> Result<Vec<Title>, Absent> {
        let base = parse_base(base_url, PageKind::Index, code_type.as_str())
            .inspect_err(|absent| self.observer.node_unavailable(absent))?;

        let titles = match self.source.fetch(base_url).await {
            Ok(document) => extract_titles(&document, &base),
            Err(e) => {
                let absent = Absent::new(PageKind::Index, code_type.as_str(), &e);
                self.observer.node_unavailable(&absent);
                return Err(absent);
            }
        };

        let titles = self.dedupe(titles, NodeKind::Title, |t| &t.title_number);
        tracing::info!("Found {} titles for {}", titles.len(), code_type);
        Ok(titles)
    }

    /// Fetches a title page and extracts its chapters
    pub async fn expand_title(&self, title: &Title, base_url: &Url) -> Result<Vec<Chapter>, Absent> {
        let chapters = match self.source.fetch(&title.url).await {
            Ok(document) => extract_chapters(&document, base_url, title),
            Err(e) => {
                let absent = Absent::new(NodeKind::Title, &title.title_number, &e);
                self.observer.node_unavailable(&absent);
                return Err(absent);
            }
        };

        let chapters = self.dedupe(chapters, NodeKind::Chapter, |c| &c.chapter_number);
        self.observer.children_found(
            NodeKind::Title,
            &title.title_number,
            NodeKind::Chapter,
            chapters.len(),
        );
        Ok(chapters)
    }

    /// Fetches a chapter page and extracts its sections
    pub async fn expand_chapter(
        &self,
        chapter: &Chapter,
        base_url: &Url,
    ) -> Result<Vec<Section>, Absent> {
        let sections = match self.source.fetch(&chapter.url).await {
            Ok(document) => extract_sections(&document, base_url, chapter),
            Err(e) => {
                let absent = Absent::new(NodeKind::Chapter, &chapter.chapter_number, &e);
                self.observer.node_unavailable(&absent);
                return Err(absent);
            }
        };

        let sections = self.dedupe(sections, NodeKind::Section, |s| &s.section_number);
        self.observer.children_found(
            NodeKind::Chapter,
            &chapter.chapter_number,
            NodeKind::Section,
            sections.len(),
        );
        Ok(sections)
    }

    /// Expands a title into its chapters and their sections
    ///
    /// Gaps are collected rather than aborting; processing always continues
    /// with the next sibling.
    pub async fn populate_structure(&self, title: Title, base_url: &Url) -> Expansion<Title> {
        tracing::info!(
            "Scraping structure for title {}: {}",
            title.title_number,
            title.name
        );

        let mut gaps = Vec::new();

        let chapters = match self.expand_title(&title, base_url).await {
            Ok(chapters) => chapters,
            Err(absent) => {
                gaps.push(absent);
                return Expansion {
                    node: Title {
                        chapters: Vec::new(),
                        ..title
                    },
                    gaps,
                };
            }
        };

        let mut populated = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let sections = match self.expand_chapter(&chapter, base_url).await {
                Ok(sections) => sections,
                Err(absent) => {
                    gaps.push(absent);
                    Vec::new()
                }
            };
            populated.push(Chapter { sections, ..chapter });
        }

        Expansion {
            node: Title {
                chapters: populated,
                ..title
            },
            gaps,
        }
    }

    /// Builds the complete tree for one code type
    ///
    /// Returns Err only when the index page itself is unavailable.
    pub async fn crawl(
        &self,
        base_url: &str,
        code_type: CodeType,
    ) -> Result<Expansion<Vec<Title>>, Absent> {
        let titles = self.discover_titles(base_url, code_type).await?;
        let base = parse_base(base_url, PageKind::Index, code_type.as_str())?;

        tracing::info!(
            "Scraping detailed structure for {} titles...",
            titles.len()
        );

        let total = titles.len();
        let mut populated = Vec::with_capacity(total);
        let mut gaps = Vec::new();

        for (i, title) in titles.into_iter().enumerate() {
            tracing::info!("Processing title {}/{}: {}", i + 1, total, title.title_number);
            let expansion = self.populate_structure(title, &base).await;
            gaps.extend(expansion.gaps);
            populated.push(expansion.node);
        }

        Ok(Expansion {
            node: populated,
            gaps,
        })
    }

    /// Keeps the first occurrence of each number within one parent
    fn dedupe<T>(&self, items: Vec<T>, kind: NodeKind, number: impl Fn(&T) -> &String) -> Vec<T> {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|item| {
                let n = number(item);
                let fresh = seen.insert(n.clone());
                if !fresh {
                    self.observer.duplicate_dropped(kind, n);
                }
                fresh
            })
            .collect()
    }
}

fn parse_base(base_url: &str, kind: PageKind, number: &str) -> Result<Url, Absent> {
    Url::parse(base_url).map_err(|e| Absent {
        kind,
        number: number.to_string(),
        url: base_url.to_string(),
        reason: format!("invalid base URL: {}", e),
    })
}

/// Result of generating one registry
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub registry: Registry,
    pub path: PathBuf,
    /// Nodes left without children because their page could not be fetched
    pub gaps: Vec<Absent>,
}

/// Crawls a code type and snapshots the result
pub struct RegistryGenerator<S> {
    crawler: Crawler<S>,
    store: RegistryStore,
    sources: SourcesConfig,
}

impl<S: PageSource> RegistryGenerator<S> {
    pub fn new(crawler: Crawler<S>, store: RegistryStore, sources: SourcesConfig) -> Self {
        Self {
            crawler,
            store,
            sources,
        }
    }

    pub fn crawler(&self) -> &Crawler<S> {
        &self.crawler
    }

    /// Generates and saves a new registry for one code type
    ///
    /// Nothing is written unless the whole tree was built.
    pub async fn generate(&self, code_type: CodeType) -> crate::Result<GenerationReport> {
        let base_url = self.sources.url_for(code_type);
        tracing::info!("Generating {} registry from {}", code_type, base_url);

        let no_titles = || ScraperError::NoTitles {
            code_type,
            url: base_url.to_string(),
        };

        let expansion = self
            .crawler
            .crawl(base_url, code_type)
            .await
            .map_err(|_| no_titles())?;

        if expansion.node.is_empty() {
            tracing::error!("Failed to scrape titles for {}", code_type);
            return Err(no_titles());
        }

        if !expansion.is_complete() {
            tracing::warn!(
                "{} registry is partial: {} pages could not be fetched",
                code_type,
                expansion.gaps.len()
            );
        }

        let registry = Registry::new(code_type, base_url, expansion.node);
        let path = self.store.save(&registry)?;
        tracing::info!("{} registry generated and saved to: {}", code_type, path.display());

        Ok(GenerationReport {
            registry,
            path,
            gaps: expansion.gaps,
        })
    }

    /// Generates WAC then RCW; a failure of one does not stop the other
    pub async fn generate_both(&self) -> Vec<(CodeType, crate::Result<GenerationReport>)> {
        tracing::info!("Generating both WAC and RCW registries");

        let mut results = Vec::new();
        for code_type in CodeType::all() {
            results.push((code_type, self.generate(code_type).await));
        }
        results
    }
}

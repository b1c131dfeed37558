//! Content scraping over a loaded registry
//!
//! Walks every title, its disposition view, every chapter, and every section,
//! fetching the raw body of each and handing it to the content store. With
//! `skip_existing`, coordinates already in the store are not fetched again,
//! so an interrupted run resumes where it stopped.

use crate::crawler::fetcher::PageSource;
use crate::crawler::observer::{Absent, CrawlObserver, TracingObserver};
use crate::model::{CodeType, Coordinate, Registry, Title};
use crate::storage::{ContentStore, RegistryStore, StoreResult};
use crate::ScraperError;
use std::sync::Arc;

/// Outcome of scraping one title's content
#[derive(Debug, Clone, Default)]
pub struct TitleScrape {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: Vec<Absent>,
}

impl TitleScrape {
    /// True if no node of the title failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of scraping a registry
#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    pub titles_total: usize,
    pub titles_succeeded: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: Vec<Absent>,
}

impl ScrapeSummary {
    /// Successful only if at least one title was selected and every one was
    /// fully processed
    pub fn is_success(&self) -> bool {
        self.titles_total > 0 && self.titles_succeeded == self.titles_total && self.failed.is_empty()
    }

    fn record(&mut self, title: TitleScrape) {
        self.titles_total += 1;
        if title.is_complete() {
            self.titles_succeeded += 1;
        }
        self.fetched += title.fetched;
        self.skipped += title.skipped;
        self.failed.extend(title.failed);
    }
}

/// Fetches and stores the document behind every registry node
pub struct ContentScraper<S> {
    source: S,
    store: ContentStore,
    observer: Arc<dyn CrawlObserver>,
}

impl<S: PageSource> ContentScraper<S> {
    pub fn new(source: S, store: ContentStore) -> Self {
        Self::with_observer(source, store, Arc::new(TracingObserver))
    }

    pub fn with_observer(source: S, store: ContentStore, observer: Arc<dyn CrawlObserver>) -> Self {
        Self {
            source,
            store,
            observer,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Scrapes one title: its page, disposition view, chapters, and sections
    ///
    /// Fetch failures are recorded and skipped; store write failures abort.
    pub async fn scrape_title_content(
        &self,
        title: &Title,
        code_type: CodeType,
        skip_existing: bool,
    ) -> StoreResult<TitleScrape> {
        tracing::info!("Scraping content for {} title {}", code_type, title.title_number);

        let mut outcome = TitleScrape::default();

        let coordinate = Coordinate::title(code_type, &title.title_number);
        self.scrape_node(&title.url, &coordinate, skip_existing, &mut outcome)
            .await?;

        if let Some(disposition_url) = &title.disposition_url {
            let coordinate = Coordinate::disposition(code_type, &title.title_number);
            self.scrape_node(disposition_url, &coordinate, skip_existing, &mut outcome)
                .await?;
        }

        for chapter in &title.chapters {
            let coordinate =
                Coordinate::chapter(code_type, &title.title_number, &chapter.chapter_number);
            self.scrape_node(&chapter.url, &coordinate, skip_existing, &mut outcome)
                .await?;

            for section in &chapter.sections {
                let coordinate = Coordinate::section(
                    code_type,
                    &title.title_number,
                    &chapter.chapter_number,
                    &section.section_number,
                );
                self.scrape_node(&section.url, &coordinate, skip_existing, &mut outcome)
                    .await?;
            }
        }

        if !outcome.is_complete() {
            tracing::warn!(
                "Title {} incomplete: {} nodes failed",
                title.title_number,
                outcome.failed.len()
            );
        }

        Ok(outcome)
    }

    /// Scrapes every title of a registry, or only those in `title_filter`
    pub async fn scrape_registry(
        &self,
        registry: &Registry,
        skip_existing: bool,
        title_filter: &[String],
    ) -> StoreResult<ScrapeSummary> {
        let titles: Vec<&Title> = registry
            .titles
            .iter()
            .filter(|t| title_filter.is_empty() || title_filter.contains(&t.title_number))
            .collect();

        if titles.is_empty() {
            tracing::warn!(
                "No {} titles selected (filter: {:?})",
                registry.code_type,
                title_filter
            );
        }

        tracing::info!(
            "Scraping content for {} {} titles",
            titles.len(),
            registry.code_type
        );

        let mut summary = ScrapeSummary::default();
        for (i, title) in titles.iter().enumerate() {
            tracing::info!("Processing title {}/{}: {}", i + 1, titles.len(), title.title_number);
            let outcome = self
                .scrape_title_content(title, registry.code_type, skip_existing)
                .await?;
            summary.record(outcome);
        }

        tracing::info!(
            "{} content scraping: {}/{} titles succeeded ({} fetched, {} skipped, {} failed)",
            registry.code_type,
            summary.titles_succeeded,
            summary.titles_total,
            summary.fetched,
            summary.skipped,
            summary.failed.len()
        );

        Ok(summary)
    }

    /// Scrapes the newest registry snapshot for a code type
    pub async fn scrape_latest(
        &self,
        registries: &RegistryStore,
        code_type: CodeType,
        skip_existing: bool,
        title_filter: &[String],
    ) -> crate::Result<ScrapeSummary> {
        let registry = registries
            .latest(code_type)?
            .ok_or(ScraperError::NoRegistry(code_type))?;

        Ok(self
            .scrape_registry(&registry, skip_existing, title_filter)
            .await?)
    }

    async fn scrape_node(
        &self,
        url: &str,
        coordinate: &Coordinate,
        skip_existing: bool,
        outcome: &mut TitleScrape,
    ) -> StoreResult<()> {
        if skip_existing && self.store.exists(coordinate) {
            self.observer.content_skipped(coordinate);
            outcome.skipped += 1;
            return Ok(());
        }

        match self.source.fetch_raw(url).await {
            Ok(body) => {
                let path = self.store.save(&body, coordinate)?;
                self.observer.content_saved(coordinate, &path);
                outcome.fetched += 1;
            }
            Err(e) => {
                let number = coordinate
                    .section_number
                    .as_ref()
                    .or(coordinate.chapter_number.as_ref())
                    .unwrap_or(&coordinate.title_number);
                let absent = Absent::new(coordinate.kind(), number.as_str(), &e);
                self.observer.node_unavailable(&absent);
                outcome.failed.push(absent);
            }
        }

        Ok(())
    }
}

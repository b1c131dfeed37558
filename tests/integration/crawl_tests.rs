//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small legal code sites and drive
//! registry generation and content scraping end-to-end over HTTP.

use tempfile::TempDir;
use wa_law_scraper::config::SourcesConfig;
use wa_law_scraper::crawler::{
    ContentScraper, Crawler, PageFetcher, PageKind, PageSource, RegistryGenerator, StaticIdentity,
};
use wa_law_scraper::model::{CodeType, Coordinate, NodeKind};
use wa_law_scraper::{ContentStore, RegistryStore, ScraperError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAC_PATH: &str = "/WAC/default.aspx";
const RCW_PATH: &str = "/RCW/default.aspx";

/// Builds a listing page of `cite` links with their names in the next cell
fn listing(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(cite, name)| {
            format!(
                r#"<tr><td><a href="default.aspx?cite={}">{}</a></td><td>{}</td></tr>"#,
                cite, cite, name
            )
        })
        .collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}

/// Mounts a page for `cite` under `page_path`
async fn mount_cite(server: &MockServer, page_path: &str, cite: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .and(query_param("cite", cite))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts the index page. Must be mounted after every cite page, since
/// it matches on path alone and earlier mocks take precedence.
async fn mount_index(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Two-title WAC site in hyphen form
async fn mount_wac_site(server: &MockServer) {
    mount_cite(server, WAC_PATH, "1", listing(&[("1-04", "General"), ("1-08", "Scope")])).await;
    mount_cite(
        server,
        WAC_PATH,
        "1-04",
        listing(&[("1-04-010", "Purpose"), ("1-04-020", "Definitions")]),
    )
    .await;
    mount_cite(server, WAC_PATH, "1-08", listing(&[("1-08-010", "Application")])).await;
    mount_cite(server, WAC_PATH, "2", listing(&[("2-02", "Procedure")])).await;
    mount_cite(server, WAC_PATH, "2-02", listing(&[("2-02-005", "Filing")])).await;
    mount_index(
        server,
        WAC_PATH,
        listing(&[("1", "Code Reviser"), ("2", "Hearings")]),
    )
    .await;
}

fn fetcher() -> PageFetcher {
    PageFetcher::new(&StaticIdentity("TestScraper/1.0".into()), "TestScraper/1.0", None)
        .expect("Failed to build fetcher")
}

fn sources(server: &MockServer) -> SourcesConfig {
    SourcesConfig {
        wac_url: format!("{}{}", server.uri(), WAC_PATH),
        rcw_url: format!("{}{}", server.uri(), RCW_PATH),
    }
}

fn generator(server: &MockServer, dir: &TempDir) -> RegistryGenerator<PageFetcher> {
    let store = RegistryStore::new(dir.path()).expect("Failed to create registry store");
    RegistryGenerator::new(Crawler::new(fetcher()), store, sources(server))
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_generate_wac_registry() {
    let server = MockServer::start().await;
    mount_wac_site(&server).await;
    let dir = TempDir::new().unwrap();

    let report = generator(&server, &dir)
        .generate(CodeType::Wac)
        .await
        .expect("Generation should succeed");

    assert!(report.gaps.is_empty());
    let registry = &report.registry;
    assert_eq!(registry.code_type, CodeType::Wac);
    assert_eq!(registry.titles.len(), 2);
    assert_eq!(registry.chapter_count(), 3);
    assert_eq!(registry.section_count(), 4);

    let title = &registry.titles[0];
    assert_eq!(title.title_number, "1");
    assert_eq!(title.name, "Code Reviser");
    assert_eq!(
        title.url,
        format!("{}{}?cite=1", server.uri(), WAC_PATH)
    );
    assert_eq!(
        title.disposition_url.as_deref(),
        Some(format!("{}{}?cite=1&dispo=true", server.uri(), WAC_PATH).as_str())
    );

    let section = &title.chapters[0].sections[1];
    assert_eq!(section.section_number, "1-04-020");
    assert_eq!(section.name, "Definitions");
    assert_eq!(section.parent_chapter_number, "1-04");
    assert_eq!(section.parent_title_number, "1");

    // 1 index + 2 titles + 3 chapters
    assert_eq!(request_count(&server).await, 6);

    // The snapshot on disk is the registry that was returned
    let store = RegistryStore::new(dir.path()).unwrap();
    assert_eq!(store.latest(CodeType::Wac).unwrap().as_ref(), Some(registry));
}

#[tokio::test]
async fn test_generate_rcw_registry_in_period_form() {
    let server = MockServer::start().await;
    mount_cite(&server, RCW_PATH, "9A", listing(&[("9A.04", "Preliminary")])).await;
    mount_cite(
        &server,
        RCW_PATH,
        "9A.04",
        listing(&[("9A.04.010", "Title"), ("9A.04.020", "Purposes")]),
    )
    .await;
    mount_index(&server, RCW_PATH, listing(&[("9A", "Criminal code")])).await;
    let dir = TempDir::new().unwrap();

    let report = generator(&server, &dir)
        .generate(CodeType::Rcw)
        .await
        .expect("Generation should succeed");

    let title = &report.registry.titles[0];
    assert_eq!(title.title_number, "9A");
    let chapter = &title.chapters[0];
    assert_eq!(chapter.chapter_number, "9A-04");
    assert_eq!(chapter.url, format!("{}{}?cite=9A.04", server.uri(), RCW_PATH));

    let numbers: Vec<_> = chapter
        .sections
        .iter()
        .map(|s| s.section_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["9A-04-010", "9A-04-020"]);
}

#[tokio::test]
async fn test_failed_title_page_leaves_partial_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WAC_PATH))
        .and(query_param("cite", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_wac_site(&server).await;
    let dir = TempDir::new().unwrap();

    let report = generator(&server, &dir)
        .generate(CodeType::Wac)
        .await
        .expect("A failed title page is not fatal");

    assert_eq!(report.registry.titles.len(), 2);
    assert_eq!(report.registry.titles[0].chapters.len(), 2);
    assert!(report.registry.titles[1].chapters.is_empty());

    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].kind, PageKind::Node(NodeKind::Title));
    assert_eq!(report.gaps[0].number, "2");
    assert!(report.path.exists());
}

#[tokio::test]
async fn test_index_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WAC_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let err = generator(&server, &dir)
        .generate(CodeType::Wac)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::NoTitles { code_type: CodeType::Wac, .. }));
    let store = RegistryStore::new(dir.path()).unwrap();
    assert!(store.list(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_links_without_citation_are_ignored() {
    let server = MockServer::start().await;
    mount_cite(&server, WAC_PATH, "1", listing(&[])).await;
    mount_cite(&server, WAC_PATH, "2", listing(&[])).await;
    let index = r#"<html><body><table>
        <tr><td><a href="default.aspx?cite=1">1</a></td><td>Code Reviser</td></tr>
        <tr><td><a href="/help/about.aspx">About</a></td><td>Help</td></tr>
        <tr><td><a href="default.aspx?cite=2">2</a></td><td>Hearings</td></tr>
        </table></body></html>"#;
    mount_index(&server, WAC_PATH, index.to_string()).await;

    let crawler = Crawler::new(fetcher());
    let titles = crawler
        .discover_titles(&sources(&server).wac_url, CodeType::Wac)
        .await
        .expect("Index should be fetched");

    let numbers: Vec<_> = titles.iter().map(|t| t.title_number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2"]);
}

#[tokio::test]
async fn test_generate_both_continues_after_failure() {
    let server = MockServer::start().await;
    mount_wac_site(&server).await;
    // No RCW pages are mounted, so the RCW index answers 404
    let dir = TempDir::new().unwrap();

    let results = generator(&server, &dir).generate_both().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, CodeType::Wac);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, CodeType::Rcw);
    assert!(results[1].1.is_err());
}

#[tokio::test]
async fn test_content_scrape_is_resumable() {
    let server = MockServer::start().await;
    mount_wac_site(&server).await;
    let dir = TempDir::new().unwrap();

    generator(&server, &dir)
        .generate(CodeType::Wac)
        .await
        .expect("Generation should succeed");
    let after_generate = request_count(&server).await;

    let registries = RegistryStore::new(dir.path()).unwrap();
    let content = ContentStore::new(dir.path(), "html").unwrap();
    let scraper = ContentScraper::new(fetcher(), content);

    let first = scraper
        .scrape_latest(&registries, CodeType::Wac, true, &[])
        .await
        .expect("Scrape should succeed");

    // 2 titles + 2 dispositions + 3 chapters + 4 sections
    assert!(first.is_success());
    assert_eq!(first.fetched, 11);
    assert_eq!(request_count(&server).await, after_generate + 11);

    let stats = scraper.store().stats();
    assert_eq!(stats.total_files, 11);
    assert_eq!(stats.count_of(NodeKind::Disposition), 2);
    assert_eq!(stats.count_of(NodeKind::Section), 4);
    assert!(scraper
        .store()
        .exists(&Coordinate::section(CodeType::Wac, "1", "1-04", "1-04-020")));

    let before_second = request_count(&server).await;
    let second = scraper
        .scrape_latest(&registries, CodeType::Wac, true, &[])
        .await
        .expect("Scrape should succeed");

    assert_eq!(second.fetched, 0);
    assert_eq!(second.skipped, 11);
    assert_eq!(request_count(&server).await, before_second);
}

#[tokio::test]
async fn test_content_scrape_records_failed_nodes() {
    let server = MockServer::start().await;
    mount_wac_site(&server).await;
    let dir = TempDir::new().unwrap();

    generator(&server, &dir)
        .generate(CodeType::Wac)
        .await
        .expect("Generation should succeed");

    // Chapter 1-08 starts failing once the registry exists
    server.reset().await;
    Mock::given(method("GET"))
        .and(path(WAC_PATH))
        .and(query_param("cite", "1-08"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_wac_site(&server).await;

    let registries = RegistryStore::new(dir.path()).unwrap();
    let content = ContentStore::new(dir.path(), "html").unwrap();
    let scraper = ContentScraper::new(fetcher(), content);

    let summary = scraper
        .scrape_latest(&registries, CodeType::Wac, true, &[])
        .await
        .expect("Fetch failures are not fatal");

    assert!(!summary.is_success());
    assert_eq!(summary.titles_total, 2);
    assert_eq!(summary.titles_succeeded, 1);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].number, "1-08");
    // Section 1-08-010 is still fetched after its chapter page failed
    assert_eq!(summary.fetched, 10);
}

#[tokio::test]
async fn test_content_bytes_are_stored_verbatim() {
    let server = MockServer::start().await;
    // Latin-1 body that is not valid UTF-8
    let body: &[u8] = b"<html><body>Caf\xe9 \xa7 1-04-010</body></html>";
    Mock::given(method("GET"))
        .and(path(WAC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let store = ContentStore::new(dir.path(), "html").unwrap();

    let fetched = fetcher()
        .fetch_raw(&sources(&server).wac_url)
        .await
        .expect("Fetch should succeed");
    assert_eq!(fetched, body);

    let path = store
        .save(&fetched, &Coordinate::title(CodeType::Wac, "1"))
        .unwrap();
    assert_eq!(std::fs::read(path).unwrap(), body);
}

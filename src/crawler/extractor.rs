//! Hierarchy extraction from index pages
//!
//! Child nodes are recognized by the citation token in their link target
//! (`cite=...`). Titles use a single form, `<digits><letters>`. Chapters and
//! sections are published in two dialects that differ only in separator:
//!
//! | Dialect | Chapter of title `1` | Section of chapter `1-04` |
//! |---------|----------------------|---------------------------|
//! | Hyphen  | `cite=1-04`          | `cite=1-04-010`           |
//! | Period  | `cite=1.04`          | `cite=1.04.010`           |
//!
//! Each anchor is tried against an ordered list of patterns and the first match
//! wins. Numbers are always normalized to hyphen form. Anchors whose token does
//! not parse into a clean number are dropped silently.

use crate::model::{Chapter, Section, Title};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// The citation token inside a link target
#[allow(clippy::expect_used)]
static CITE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[?&])cite=([^&#]*)").expect("cite token regex is valid") // Static pattern
});

/// One citation number component: digits with optional trailing letters
#[allow(clippy::expect_used)]
static NUMBER_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[A-Za-z]*$").expect("number component regex is valid") // Static pattern
});

/// Separator convention used in citation numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Hyphen,
    Period,
}

impl Dialect {
    pub fn separator(&self) -> char {
        match self {
            Self::Hyphen => '-',
            Self::Period => '.',
        }
    }
}

/// A link reduced to the fields the hierarchy needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Normalized (hyphen form) citation number
    pub number: String,
    pub name: String,
    /// Absolute URL
    pub url: String,
}

/// A single way of recognizing a child's citation token
#[derive(Debug, Clone)]
pub struct CitationPattern {
    /// Normalized parent number, None for top-level titles
    parent: Option<String>,
    /// Token prefix in this pattern's dialect, e.g. `1.04.`
    prefix: String,
}

impl CitationPattern {
    /// Pattern for top-level titles
    pub fn title() -> Self {
        Self {
            parent: None,
            prefix: String::new(),
        }
    }

    /// Pattern for children of `parent` written in `dialect`
    pub fn child_of(parent: &str, dialect: Dialect) -> Self {
        let sep = dialect.separator();
        let mut prefix: String = parent
            .chars()
            .map(|c| if c == '-' { sep } else { c })
            .collect();
        prefix.push(sep);
        Self {
            parent: Some(parent.to_string()),
            prefix,
        }
    }

    /// Returns the normalized number if `token` is a clean match
    pub fn match_token(&self, token: &str) -> Option<String> {
        let head = token.get(..self.prefix.len())?;
        if !head.eq_ignore_ascii_case(&self.prefix) {
            return None;
        }
        let component = &token[self.prefix.len()..];
        if !NUMBER_COMPONENT.is_match(component) {
            return None;
        }
        Some(match &self.parent {
            Some(parent) => format!("{}-{}", parent, component),
            None => component.to_string(),
        })
    }
}

/// Ordered list of patterns tried against every anchor
#[derive(Debug, Clone)]
pub struct CitationMatcher {
    patterns: Vec<CitationPattern>,
}

impl CitationMatcher {
    /// Matcher for the title links of a code's index page
    pub fn titles() -> Self {
        Self {
            patterns: vec![CitationPattern::title()],
        }
    }

    /// Matcher for children of `parent`, accepting both dialects
    pub fn children_of(parent: &str) -> Self {
        Self {
            patterns: vec![
                CitationPattern::child_of(parent, Dialect::Hyphen),
                CitationPattern::child_of(parent, Dialect::Period),
            ],
        }
    }

    /// First pattern to match wins; None if no pattern matches
    pub fn match_token(&self, token: &str) -> Option<String> {
        self.patterns.iter().find_map(|p| p.match_token(token))
    }
}

/// Extracts the raw citation token from a link target
pub fn citation_token(href: &str) -> Option<&str> {
    CITE_TOKEN
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Extracts every matching child link in document order
///
/// No de-duplication happens here.
pub fn extract_links(
    document: &Html,
    base_url: &Url,
    matcher: &CitationMatcher,
) -> Vec<ExtractedLink> {
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(number) = citation_token(href).and_then(|t| matcher.match_token(t)) else {
            continue;
        };
        let Ok(url) = base_url.join(href.trim()) else {
            continue;
        };

        let name = sibling_cell_text(&element).unwrap_or_else(|| collapse_text(element));

        links.push(ExtractedLink {
            number,
            name,
            url: url.to_string(),
        });
    }

    links
}

/// Text of the table cell following the cell that contains `link`
fn sibling_cell_text(link: &ElementRef) -> Option<String> {
    let cell = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| is_cell(e))?;

    let next = cell
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| is_cell(e))?;

    let text = collapse_text(next);
    (!text.is_empty()).then_some(text)
}

fn is_cell(element: &ElementRef) -> bool {
    matches!(element.value().name(), "td" | "th")
}

fn collapse_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts titles from a code's index page
pub fn extract_titles(document: &Html, base_url: &Url) -> Vec<Title> {
    extract_links(document, base_url, &CitationMatcher::titles())
        .into_iter()
        .map(|link| Title::new(link.name, link.url, link.number))
        .collect()
}

/// Extracts chapters from a title page
pub fn extract_chapters(document: &Html, base_url: &Url, title: &Title) -> Vec<Chapter> {
    extract_links(
        document,
        base_url,
        &CitationMatcher::children_of(&title.title_number),
    )
    .into_iter()
    .map(|link| Chapter::new(link.name, link.url, link.number, title))
    .collect()
}

/// Extracts sections from a chapter page
pub fn extract_sections(document: &Html, base_url: &Url, chapter: &Chapter) -> Vec<Section> {
    extract_links(
        document,
        base_url,
        &CitationMatcher::children_of(&chapter.chapter_number),
    )
    .into_iter()
    .map(|link| Section::new(link.name, link.url, link.number, chapter))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://app.leg.wa.gov/wac/default.aspx").unwrap()
    }

    fn row(href: &str, label: &str, name: &str) -> String {
        format!(
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td></tr>"#,
            href, label, name
        )
    }

    fn page(rows: &[String]) -> Html {
        Html::parse_document(&format!(
            "<html><body><table>{}</table></body></html>",
            rows.concat()
        ))
    }

    #[test]
    fn test_citation_token() {
        assert_eq!(citation_token("default.aspx?cite=1-04"), Some("1-04"));
        assert_eq!(citation_token("default.aspx?x=1&Cite=28A.150&full=true"), Some("28A.150"));
        assert_eq!(citation_token("default.aspx?CITE=2#top"), Some("2"));
        assert_eq!(citation_token("default.aspx?excite=1"), None);
        assert_eq!(citation_token("default.aspx?cite="), None);
        assert_eq!(citation_token("/about"), None);
    }

    #[test]
    fn test_title_pattern() {
        let matcher = CitationMatcher::titles();
        assert_eq!(matcher.match_token("1"), Some("1".to_string()));
        assert_eq!(matcher.match_token("28A"), Some("28A".to_string()));
        assert_eq!(matcher.match_token("1-04"), None);
        assert_eq!(matcher.match_token("A1"), None);
    }

    #[test]
    fn test_both_dialects_normalize_to_hyphen() {
        let matcher = CitationMatcher::children_of("1-04");
        assert_eq!(matcher.match_token("1-04-010"), Some("1-04-010".to_string()));
        assert_eq!(matcher.match_token("1.04.020"), Some("1-04-020".to_string()));
    }

    #[test]
    fn test_child_pattern_rejects_other_parents() {
        let matcher = CitationMatcher::children_of("1");
        assert_eq!(matcher.match_token("10-04"), None);
        assert_eq!(matcher.match_token("1-04-010"), None);
        assert_eq!(matcher.match_token("1-"), None);
        assert_eq!(matcher.match_token("1.04"), Some("1-04".to_string()));
    }

    #[test]
    fn test_letters_in_numbers() {
        let matcher = CitationMatcher::children_of("28A-150");
        assert_eq!(
            matcher.match_token("28A.150.010"),
            Some("28A-150-010".to_string())
        );
        let matcher = CitationMatcher::children_of("43-21C");
        assert_eq!(
            matcher.match_token("43.21C.030A"),
            Some("43-21C-030A".to_string())
        );
    }

    #[test]
    fn test_extract_titles_skips_links_without_token() {
        let document = page(&[
            row("default.aspx?cite=1", "1", "Rules of Practice"),
            row("default.aspx?search=1", "Search", "Search the code"),
            row("default.aspx?cite=2", "2", "Administrative Hearings"),
        ]);

        let titles = extract_titles(&document, &base_url());

        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].title_number, "1");
        assert_eq!(titles[0].name, "Rules of Practice");
        assert_eq!(
            titles[0].url,
            "https://app.leg.wa.gov/wac/default.aspx?cite=1"
        );
        assert_eq!(
            titles[0].disposition_url.as_deref(),
            Some("https://app.leg.wa.gov/wac/default.aspx?cite=1&dispo=true")
        );
        assert_eq!(titles[1].title_number, "2");
    }

    #[test]
    fn test_name_falls_back_to_link_text() {
        let document = Html::parse_document(
            r#"<html><body><p><a href="default.aspx?cite=4">  Title   4 </a></p></body></html>"#,
        );
        let titles = extract_titles(&document, &base_url());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].name, "Title 4");
    }

    #[test]
    fn test_empty_sibling_cell_falls_back_to_link_text() {
        let document = page(&[row("default.aspx?cite=5", "5", "   ")]);
        let titles = extract_titles(&document, &base_url());
        assert_eq!(titles[0].name, "5");
    }

    #[test]
    fn test_extract_mixed_dialect_sections_in_document_order() {
        let title = Title::new("General".into(), "u".into(), "1".into());
        let chapter = Chapter::new("Intro".into(), "u".into(), "1-04".into(), &title);
        let document = page(&[
            row("default.aspx?cite=1.04.020", "1.04.020", "Second"),
            row("default.aspx?cite=1-04-010", "1-04-010", "First"),
            row("default.aspx?cite=1-04", "1-04", "Whole chapter"),
            row("default.aspx?cite=1-08-010", "1-08-010", "Other chapter"),
        ]);

        let sections = extract_sections(&document, &base_url(), &chapter);

        let numbers: Vec<_> = sections.iter().map(|s| s.section_number.as_str()).collect();
        assert_eq!(numbers, vec!["1-04-020", "1-04-010"]);
        assert_eq!(sections[0].name, "Second");
        assert_eq!(sections[0].parent_chapter_number, "1-04");
        assert_eq!(sections[0].parent_title_number, "1");
    }

    #[test]
    fn test_single_dialect_introduces_no_duplicates() {
        let title = Title::new("General".into(), "u".into(), "1".into());
        let document = page(&[
            row("default.aspx?cite=1-04", "1-04", "Intro"),
            row("default.aspx?cite=1-08", "1-08", "Scope"),
        ]);

        let chapters = extract_chapters(&document, &base_url(), &title);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter_number, "1-04");
        assert_eq!(chapters[1].chapter_number, "1-08");
    }

    #[test]
    fn test_repeated_links_are_kept() {
        let document = page(&[
            row("default.aspx?cite=1", "1", "One"),
            row("default.aspx?cite=1", "1", "One again"),
        ]);
        let links = extract_links(&document, &base_url(), &CitationMatcher::titles());
        assert_eq!(links.len(), 2);
    }
}

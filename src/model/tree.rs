//! The legal code tree: titles own chapters, chapters own sections
//!
//! Children carry their parents' numbers so a node can be addressed
//! without walking back up the tree.

use crate::model::CodeType;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Query parameter appended to a title URL to reach its disposition view
const DISPOSITION_PARAM: &str = "dispo=true";

/// A legal section within a chapter. Leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub url: String,
    pub section_number: String,
    pub parent_chapter_number: String,
    pub parent_title_number: String,
}

/// A legal chapter within a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    pub url: String,
    pub chapter_number: String,
    pub parent_title_number: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A legal title containing chapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub name: String,
    pub url: String,
    pub title_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition_url: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// Complete structure of one legal code at one point in time
///
/// A registry is immutable once persisted. `created_at` is stamped at
/// construction and determines the snapshot's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub code_type: CodeType,
    pub created_at: NaiveDateTime,
    pub base_url: String,
    #[serde(default)]
    pub titles: Vec<Title>,
}

/// Derives the disposition view URL for a title URL
pub fn disposition_url_for(url: &str) -> String {
    if url.contains('?') {
        format!("{}&{}", url, DISPOSITION_PARAM)
    } else {
        format!("{}?{}", url, DISPOSITION_PARAM)
    }
}

impl Section {
    pub fn new(name: String, url: String, section_number: String, chapter: &Chapter) -> Self {
        Self {
            name,
            url,
            section_number,
            parent_chapter_number: chapter.chapter_number.clone(),
            parent_title_number: chapter.parent_title_number.clone(),
        }
    }
}

impl Chapter {
    pub fn new(name: String, url: String, chapter_number: String, title: &Title) -> Self {
        Self {
            name,
            url,
            chapter_number,
            parent_title_number: title.title_number.clone(),
            sections: Vec::new(),
        }
    }
}

impl Title {
    /// Creates a title with no chapters and a derived disposition URL
    pub fn new(name: String, url: String, title_number: String) -> Self {
        let disposition_url = Some(disposition_url_for(&url));
        Self {
            name,
            url,
            title_number,
            disposition_url,
            chapters: Vec::new(),
        }
    }

    /// Number of sections across all chapters of this title
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }
}

impl Registry {
    /// Creates a registry stamped with the current local time
    pub fn new(code_type: CodeType, base_url: impl Into<String>, titles: Vec<Title>) -> Self {
        Self::with_created_at(code_type, Local::now().naive_local(), base_url, titles)
    }

    pub fn with_created_at(
        code_type: CodeType,
        created_at: NaiveDateTime,
        base_url: impl Into<String>,
        titles: Vec<Title>,
    ) -> Self {
        Self {
            code_type,
            created_at,
            base_url: base_url.into(),
            titles,
        }
    }

    /// File stem of this registry's snapshot: `{code}_registry_YYYYMMDD_HHMMSS`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_registry_{}",
            self.code_type.as_lower(),
            self.created_at.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn chapter_count(&self) -> usize {
        self.titles.iter().map(|t| t.chapters.len()).sum()
    }

    pub fn section_count(&self) -> usize {
        self.titles.iter().map(Title::section_count).sum()
    }

    /// Looks up a title by its number
    pub fn title(&self, title_number: &str) -> Option<&Title> {
        self.titles.iter().find(|t| t.title_number == title_number)
    }
}

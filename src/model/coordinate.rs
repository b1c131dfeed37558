//! Content coordinates and node kinds
//!
//! A coordinate addresses one stored document. Path derivation is a pure
//! function of the coordinate; equality is purely lexical.

use crate::model::CodeType;
use std::fmt;
use std::path::PathBuf;

/// The kind of node a coordinate refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Title,
    Disposition,
    Chapter,
    Section,
}

impl NodeKind {
    /// Returns all node kinds
    pub fn all() -> [Self; 4] {
        [Self::Title, Self::Disposition, Self::Chapter, Self::Section]
    }

    /// File name prefix used for this kind of node
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Title | Self::Disposition => "title_",
            Self::Chapter => "chapter_",
            Self::Section => "section_",
        }
    }

    /// Classifies a stored file name. Returns None for unrelated files.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        if stem.starts_with("section_") {
            Some(Self::Section)
        } else if stem.starts_with("chapter_") {
            Some(Self::Chapter)
        } else if stem.starts_with("title_") {
            if stem.ends_with("_disposition") {
                Some(Self::Disposition)
            } else {
                Some(Self::Title)
            }
        } else {
            None
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Title => "title",
            Self::Disposition => "disposition",
            Self::Chapter => "chapter",
            Self::Section => "section",
        };
        f.write_str(s)
    }
}

/// Hierarchy coordinate of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub code_type: CodeType,
    pub title_number: String,
    pub chapter_number: Option<String>,
    pub section_number: Option<String>,
    /// Only meaningful at title level
    pub is_disposition: bool,
}

impl Coordinate {
    pub fn title(code_type: CodeType, title_number: impl Into<String>) -> Self {
        Self {
            code_type,
            title_number: title_number.into(),
            chapter_number: None,
            section_number: None,
            is_disposition: false,
        }
    }

    pub fn disposition(code_type: CodeType, title_number: impl Into<String>) -> Self {
        Self {
            is_disposition: true,
            ..Self::title(code_type, title_number)
        }
    }

    pub fn chapter(
        code_type: CodeType,
        title_number: impl Into<String>,
        chapter_number: impl Into<String>,
    ) -> Self {
        Self {
            chapter_number: Some(chapter_number.into()),
            ..Self::title(code_type, title_number)
        }
    }

    pub fn section(
        code_type: CodeType,
        title_number: impl Into<String>,
        chapter_number: impl Into<String>,
        section_number: impl Into<String>,
    ) -> Self {
        Self {
            section_number: Some(section_number.into()),
            ..Self::chapter(code_type, title_number, chapter_number)
        }
    }

    /// Section dominates chapter dominates title
    pub fn kind(&self) -> NodeKind {
        if self.section_number.is_some() {
            NodeKind::Section
        } else if self.chapter_number.is_some() {
            NodeKind::Chapter
        } else if self.is_disposition {
            NodeKind::Disposition
        } else {
            NodeKind::Title
        }
    }

    /// File name for this coordinate with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        match (&self.section_number, &self.chapter_number) {
            (Some(section), _) => format!("section_{}.{}", section, extension),
            (None, Some(chapter)) => format!("chapter_{}.{}", chapter, extension),
            (None, None) if self.is_disposition => {
                format!("title_{}_disposition.{}", self.title_number, extension)
            }
            (None, None) => format!("title_{}.{}", self.title_number, extension),
        }
    }

    /// Path relative to the content root:
    /// `<code>/<title>/[<chapter>/]<file>`
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::from(self.code_type.as_lower());
        path.push(&self.title_number);
        if let Some(chapter) = &self.chapter_number {
            path.push(chapter);
        }
        path.push(self.file_name(extension));
        path
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code_type, self.kind())?;
        match (&self.section_number, &self.chapter_number) {
            (Some(section), _) => write!(f, " {}", section),
            (None, Some(chapter)) => write!(f, " {}", chapter),
            (None, None) => write!(f, " {}", self.title_number),
        }
    }
}

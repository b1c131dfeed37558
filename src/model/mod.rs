//! Data model for the legal code hierarchy
//!
//! Node identity is a coordinate, not an object reference. Citation numbers are
//! opaque strings because they carry letters and embedded separators.
//!
//! # Components
//!
//! - `CodeType`: which legal code a tree belongs to (WAC or RCW)
//! - `Section`, `Chapter`, `Title`, `Registry`: the owned tree
//! - `Coordinate`, `NodeKind`: addressing of a node's stored content

mod coordinate;
mod tree;

pub use coordinate::{Coordinate, NodeKind};
pub use tree::{disposition_url_for, Chapter, Registry, Section, Title};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two legal codes published by the legislature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeType {
    /// Washington Administrative Code
    #[serde(rename = "WAC")]
    Wac,

    /// Revised Code of Washington
    #[serde(rename = "RCW")]
    Rcw,
}

impl CodeType {
    /// Returns both code types in generation order
    pub fn all() -> [Self; 2] {
        [Self::Wac, Self::Rcw]
    }

    /// Upper-case label as used in registry files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wac => "WAC",
            Self::Rcw => "RCW",
        }
    }

    /// Lower-case token used in file names and content directories
    pub fn as_lower(&self) -> &'static str {
        match self {
            Self::Wac => "wac",
            Self::Rcw => "rcw",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wac" => Ok(Self::Wac),
            "rcw" => Ok(Self::Rcw),
            other => Err(format!("unknown code type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_type_parse_is_case_insensitive() {
        assert_eq!("WAC".parse::<CodeType>(), Ok(CodeType::Wac));
        assert_eq!("rcw".parse::<CodeType>(), Ok(CodeType::Rcw));
        assert_eq!("Rcw".parse::<CodeType>(), Ok(CodeType::Rcw));
        assert!("usc".parse::<CodeType>().is_err());
    }

    #[test]
    fn test_code_type_labels() {
        assert_eq!(CodeType::Wac.to_string(), "WAC");
        assert_eq!(CodeType::Rcw.as_lower(), "rcw");
    }
}

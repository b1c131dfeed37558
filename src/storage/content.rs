//! Raw document content store
//!
//! Documents are stored verbatim at a path derived purely from their
//! coordinate: `<data-dir>/content/<code>/<title>/[<chapter>/]<kind>_<number>[_disposition].<ext>`.
//! Statistics are recomputed by scanning the tree on every call.

use crate::model::{CodeType, Coordinate, NodeKind};
use crate::storage::traits::{atomic_write, ensure_dir, StoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counts of stored documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub total_files: usize,
    pub by_code_type: BTreeMap<CodeType, usize>,
    pub by_kind: BTreeMap<NodeKind, usize>,
    pub by_code_and_kind: BTreeMap<(CodeType, NodeKind), usize>,
}

impl ContentStats {
    pub fn count_for(&self, code_type: CodeType) -> usize {
        self.by_code_type.get(&code_type).copied().unwrap_or(0)
    }

    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Count of one kind within one code type
    pub fn count_of_in(&self, code_type: CodeType, kind: NodeKind) -> usize {
        self.by_code_and_kind
            .get(&(code_type, kind))
            .copied()
            .unwrap_or(0)
    }

    fn record(&mut self, code_type: CodeType, kind: NodeKind) {
        self.total_files += 1;
        *self.by_code_type.entry(code_type).or_insert(0) += 1;
        *self.by_kind.entry(kind).or_insert(0) += 1;
        *self.by_code_and_kind.entry((code_type, kind)).or_insert(0) += 1;
    }
}

/// Stores raw document bodies by coordinate
#[derive(Debug, Clone)]
pub struct ContentStore {
    content_dir: PathBuf,
    extension: String,
}

impl ContentStore {
    /// Opens the store under `data_dir`, creating the content directory
    pub fn new(data_dir: &Path, extension: &str) -> StoreResult<Self> {
        let content_dir = data_dir.join("content");
        ensure_dir(&content_dir)?;
        Ok(Self {
            content_dir,
            extension: extension.to_string(),
        })
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Absolute path for a coordinate
    pub fn path_for(&self, coordinate: &Coordinate) -> PathBuf {
        self.content_dir
            .join(coordinate.relative_path(&self.extension))
    }

    /// True if content for exactly this coordinate has been stored
    pub fn exists(&self, coordinate: &Coordinate) -> bool {
        self.path_for(coordinate).is_file()
    }

    /// Writes `body` verbatim for a coordinate, overwriting any previous content
    ///
    /// The file appears at its final path only once fully written, so an
    /// interrupted save never looks like stored content to `exists`.
    pub fn save(&self, body: impl AsRef<[u8]>, coordinate: &Coordinate) -> StoreResult<PathBuf> {
        let path = self.path_for(coordinate);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        atomic_write(&path, body.as_ref())?;
        Ok(path)
    }

    /// Lists stored files, optionally for one code type, in path order
    pub fn list(&self, code_type: Option<CodeType>) -> Vec<PathBuf> {
        let root = match code_type {
            Some(code) => self.content_dir.join(code.as_lower()),
            None => self.content_dir.clone(),
        };

        let suffix = format!(".{}", self.extension);

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(&suffix))
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Scans the content tree and classifies each file by code type and kind
    pub fn stats(&self) -> ContentStats {
        let mut stats = ContentStats::default();

        for path in self.list(None) {
            let Some(kind) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(NodeKind::from_file_name)
            else {
                continue;
            };

            let code_type = path
                .strip_prefix(&self.content_dir)
                .ok()
                .and_then(|rel| rel.components().next())
                .and_then(|c| c.as_os_str().to_str())
                .and_then(|token| token.parse::<CodeType>().ok());

            let Some(code_type) = code_type else {
                continue;
            };

            stats.record(code_type, kind);
        }

        stats
    }
}

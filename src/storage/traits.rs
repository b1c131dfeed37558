//! Store error types and shared file helpers

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing to a store
///
/// Write failures mean the run cannot make forward progress and are always
/// propagated.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Creates `dir` and its parents if absent
pub(crate) fn ensure_dir(dir: &Path) -> StoreResult<()> {
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `data` to a temp file beside `path`, then renames it into place
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    fs::write(temp.path(), data).map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

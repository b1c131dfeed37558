//! Registry snapshot store
//!
//! Snapshots live in `<data-dir>/registry/` as
//! `{code}_registry_YYYYMMDD_HHMMSS.yaml`. A snapshot is written once and never
//! modified; the newest file by modification time is the "latest" registry.

use crate::model::{CodeType, Registry};
use crate::storage::traits::{atomic_write, ensure_dir, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extension of snapshot files
pub const REGISTRY_EXTENSION: &str = "yaml";

const REGISTRY_MARKER: &str = "_registry_";

/// Reads and writes registry snapshots
#[derive(Debug, Clone)]
pub struct RegistryStore {
    registry_dir: PathBuf,
}

impl RegistryStore {
    /// Opens the store under `data_dir`, creating the registry directory
    pub fn new(data_dir: &Path) -> StoreResult<Self> {
        let registry_dir = data_dir.join("registry");
        ensure_dir(&registry_dir)?;
        tracing::debug!("Registry directory: {}", registry_dir.display());
        Ok(Self { registry_dir })
    }

    pub fn registry_dir(&self) -> &Path {
        &self.registry_dir
    }

    /// Snapshot path for a registry, derived from its `created_at`
    pub fn path_for(&self, registry: &Registry) -> PathBuf {
        self.registry_dir
            .join(format!("{}.{}", registry.file_stem(), REGISTRY_EXTENSION))
    }

    /// Writes the full tree atomically and returns its path
    ///
    /// Two saves of the same code type within one second share a file name;
    /// the later one wins.
    pub fn save(&self, registry: &Registry) -> StoreResult<PathBuf> {
        let path = self.path_for(registry);
        let yaml = serde_yaml::to_string(registry)?;

        if let Err(e) = atomic_write(&path, yaml.as_bytes()) {
            tracing::error!("Failed to save registry to {}: {}", path.display(), e);
            return Err(e);
        }

        tracing::info!("Registry saved to: {}", path.display());
        Ok(path)
    }

    /// Loads a snapshot. Any I/O or parse error is logged and yields None.
    pub fn load(&self, path: &Path) -> Option<Registry> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read registry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_yaml::from_str::<Registry>(&content) {
            Ok(registry) => {
                tracing::info!("Registry loaded from: {}", path.display());
                Some(registry)
            }
            Err(e) => {
                tracing::error!("Failed to parse registry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Lists snapshot files, newest modification time first
    pub fn list(&self, code_type: Option<CodeType>) -> StoreResult<Vec<PathBuf>> {
        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();

        for entry in fs::read_dir(&self.registry_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_registry_file_name(name, code_type) {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified()?;
            files.push((modified, entry.path()));
        }

        files.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Loads the newest snapshot for a code type
    pub fn latest(&self, code_type: CodeType) -> StoreResult<Option<Registry>> {
        let files = self.list(Some(code_type))?;
        match files.first() {
            Some(path) => Ok(self.load(path)),
            None => {
                tracing::info!("No registries found for {}", code_type);
                Ok(None)
            }
        }
    }
}

/// Matches `{code}_registry_*.yaml`, any code when `code_type` is None
fn is_registry_file_name(name: &str, code_type: Option<CodeType>) -> bool {
    let Some(stem) = name.strip_suffix(&format!(".{}", REGISTRY_EXTENSION)) else {
        return false;
    };

    match code_type {
        Some(code) => stem.starts_with(&format!("{}{}", code.as_lower(), REGISTRY_MARKER)),
        None => stem
            .find(REGISTRY_MARKER)
            .is_some_and(|idx| idx > 0),
    }
}

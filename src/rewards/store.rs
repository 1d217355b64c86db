//! Key-value snapshot stores backing the reward ledger.
use std::{fs, io, path::PathBuf};

use super::errors::{StoreError, StoreOperation};

const REJECTED_SUFFIX: &str = "rejected";

/// Single-slot store holding the serialized user snapshot.
pub trait SnapshotStore: Send + Sync {
    fn read(&self) -> Result<Option<String>, StoreError>;

    fn write(&mut self, snapshot: &str) -> Result<(), StoreError>;

    /// Moves an unreadable snapshot out of the way so the next write starts clean.
    fn quarantine(&mut self) -> Result<(), StoreError>;

    fn describe(&self) -> String;
}

/// Stores the snapshot as one JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::new(StoreOperation::Read, err)),
        }
    }

    fn write(&mut self, snapshot: &str) -> Result<(), StoreError> {
        let to_store_error = |err| StoreError::new(StoreOperation::Write, err);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(to_store_error)?;
        }
        // Write-then-rename so a crash mid-write never leaves a truncated snapshot.
        let staging = self.sibling("tmp");
        fs::write(&staging, snapshot).map_err(to_store_error)?;
        fs::rename(&staging, &self.path).map_err(to_store_error)
    }

    fn quarantine(&mut self) -> Result<(), StoreError> {
        match fs::rename(&self.path, self.sibling(REJECTED_SUFFIX)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::new(StoreOperation::Quarantine, err)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
pub use memory::MemorySnapshotStore;

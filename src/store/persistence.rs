//! Filesystem-backed ordering store.

use super::{DotConfig, OrderingStore};
use crate::concurrency::DirectoryLockManager;
use crate::error::StorageError;
use crate::types::DOT_CONFIG;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ordering store reading and writing `<dir>/.config` as JSON.
pub struct FsOrderingStore {
    locks: DirectoryLockManager,
}

impl FsOrderingStore {
    pub fn new() -> Self {
        Self {
            locks: DirectoryLockManager::new(),
        }
    }

    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(DOT_CONFIG)
    }
}

impl Default for FsOrderingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderingStore for FsOrderingStore {
    fn read(&self, dir: &Path) -> Result<DotConfig, StorageError> {
        let path = Self::config_path(dir);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::MissingStore(path));
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::ParseError { path, source })
    }

    fn write(&self, dir: &Path, config: &DotConfig) -> Result<(), StorageError> {
        let path = Self::config_path(dir);
        let json = serde_json::to_string(config)?;
        std::fs::write(&path, json).map_err(|e| StorageError::io(path, e))
    }

    fn lock_for(&self, dir: &Path) -> Arc<Mutex<()>> {
        self.locks.get_lock(dir)
    }
}

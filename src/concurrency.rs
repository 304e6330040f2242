//! Per-directory mutation locks for ordering stores.
//!
//! An ordering store write reads, modifies and rewrites one `.config` file. The
//! directory's lock is held across the whole cycle.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lock manager keyed by the directory that owns an ordering store.
pub struct DirectoryLockManager {
    locks: Arc<RwLock<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

impl DirectoryLockManager {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a directory.
    pub fn get_lock(&self, dir: &Path) -> Arc<Mutex<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(dir) {
                return lock.clone();
            }
        }

        // Another thread may have inserted between the two acquisitions.
        let mut map = self.locks.write();
        map.entry(dir.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of directories that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }
}

impl Default for DirectoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

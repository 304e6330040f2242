//! Ordering Store
//!
//! Every orderable directory carries a `.config` sidecar that maps child file or
//! folder names to a display title and an integer ordering. This module owns the
//! in-memory form of that mapping and the contract for reading and writing it.

pub mod persistence;
pub mod recycling;
pub mod reorder;

pub use persistence::FsOrderingStore;
pub use recycling::{RecycleLog, RecycleRecord};
pub use reorder::ReorderDirection;

use crate::error::StorageError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Reserved key carrying a container's own metadata. Never a sibling.
pub const SELF_KEY: &str = "self";

/// One ordering store record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub title: String,
    pub ordering: i64,
}

impl OrderEntry {
    pub fn new(title: impl Into<String>, ordering: i64) -> Self {
        Self {
            title: title.into(),
            ordering,
        }
    }
}

/// Contents of one `.config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DotConfig {
    entries: BTreeMap<String, OrderEntry>,
}

impl DotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OrderEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut OrderEntry> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: OrderEntry) -> Option<OrderEntry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn remove(&mut self, name: &str) -> Option<OrderEntry> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OrderEntry)> {
        self.entries.iter()
    }

    /// Highest ordering among siblings, or -1 when there are none.
    pub fn latest_ordering(&self) -> i64 {
        self.entries
            .iter()
            .filter(|(name, _)| name.as_str() != SELF_KEY)
            .map(|(_, entry)| entry.ordering)
            .max()
            .unwrap_or(-1)
    }

    /// Ordering for a record appended after every existing sibling.
    pub fn next_ordering(&self) -> i64 {
        self.latest_ordering() + 1
    }

    /// Sibling names sorted by ordering, ties broken by name.
    pub fn sibling_names(&self) -> Vec<String> {
        let mut siblings: Vec<(&String, &OrderEntry)> = self
            .entries
            .iter()
            .filter(|(name, _)| name.as_str() != SELF_KEY)
            .collect();
        siblings.sort_by(|(a_name, a), (b_name, b)| {
            a.ordering.cmp(&b.ordering).then_with(|| a_name.cmp(b_name))
        });
        siblings.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Remove `name` and close the gap it leaves.
    ///
    /// Every sibling ordered after the removed record moves down by one. Returns the
    /// removed record, or `None` if `name` had no record (nothing is shifted then).
    pub fn shift_trailing_down(&mut self, name: &str) -> Option<OrderEntry> {
        let removed = self.entries.remove(name)?;
        for (key, entry) in self.entries.iter_mut() {
            if key != SELF_KEY && entry.ordering > removed.ordering {
                entry.ordering -= 1;
            }
        }
        Some(removed)
    }

    /// Retain only the reserved `self` record.
    pub fn clear_siblings(&mut self) {
        self.entries.retain(|name, _| name == SELF_KEY);
    }

    /// True when no two siblings share an ordering value.
    pub fn orderings_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter(|(name, _)| name.as_str() != SELF_KEY)
            .all(|(_, entry)| seen.insert(entry.ordering))
    }
}

impl FromIterator<(String, OrderEntry)> for DotConfig {
    fn from_iter<I: IntoIterator<Item = (String, OrderEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Ordering store contract.
///
/// `dir` is always the directory that owns the `.config` file, never the file itself.
pub trait OrderingStore: Send + Sync {
    /// Read a directory's mapping. A missing file is an error.
    fn read(&self, dir: &Path) -> Result<DotConfig, StorageError>;

    /// Overwrite a directory's mapping.
    fn write(&self, dir: &Path, config: &DotConfig) -> Result<(), StorageError>;

    /// Lock serializing read-modify-write cycles on one directory.
    fn lock_for(&self, dir: &Path) -> Arc<Mutex<()>>;
}

/// Read, modify and write one directory's mapping while holding its lock.
pub fn update<S, T, F>(store: &S, dir: &Path, f: F) -> Result<T, StorageError>
where
    S: OrderingStore + ?Sized,
    F: FnOnce(&mut DotConfig) -> T,
{
    let lock = store.lock_for(dir);
    let _guard = lock.lock();
    let mut config = store.read(dir)?;
    let result = f(&mut config);
    store.write(dir, &config)?;
    Ok(result)
}

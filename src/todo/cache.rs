//! Per-uri invalidation cache behind the TODO view.
//!
//! Each entry is a validated count (inner nodes), validated span data
//! (fragments) or invalidated. A missing entry reads as invalidated.

use super::node::TodoNode;
use super::scan::TodoSpan;
use crate::tree::path::normalize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Count(usize),
    Todos(Vec<TodoSpan>),
    Invalidated,
}

impl CacheEntry {
    pub fn count(&self) -> Option<usize> {
        match self {
            CacheEntry::Count(count) => Some(*count),
            CacheEntry::Todos(todos) => Some(todos.len()),
            CacheEntry::Invalidated => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TodoCache {
    entries: HashMap<PathBuf, CacheEntry>,
    /// Materialized span nodes per fragment, valid while the fragment entry is.
    nodes: HashMap<PathBuf, Vec<Arc<TodoNode>>>,
}

impl TodoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, uri: &Path) -> Option<&CacheEntry> {
        self.entries.get(&normalize(uri))
    }

    pub fn is_invalidated(&self, uri: &Path) -> bool {
        self.count(uri).is_none()
    }

    pub fn count(&self, uri: &Path) -> Option<usize> {
        self.entry(uri).and_then(CacheEntry::count)
    }

    pub fn todos(&self, uri: &Path) -> Option<Vec<TodoSpan>> {
        match self.entry(uri) {
            Some(CacheEntry::Todos(todos)) => Some(todos.clone()),
            _ => None,
        }
    }

    pub fn set_count(&mut self, uri: &Path, count: usize) {
        self.entries.insert(normalize(uri), CacheEntry::Count(count));
    }

    pub fn set_todos(&mut self, uri: &Path, todos: Vec<TodoSpan>) {
        let key = normalize(uri);
        self.nodes.remove(&key);
        self.entries.insert(key, CacheEntry::Todos(todos));
    }

    pub fn nodes(&self, uri: &Path) -> Option<Vec<Arc<TodoNode>>> {
        let key = normalize(uri);
        match self.entries.get(&key) {
            Some(CacheEntry::Todos(_)) => self.nodes.get(&key).cloned(),
            _ => None,
        }
    }

    pub fn set_nodes(&mut self, uri: &Path, nodes: Vec<Arc<TodoNode>>) {
        self.nodes.insert(normalize(uri), nodes);
    }

    pub fn invalidate(&mut self, uri: &Path) {
        let key = normalize(uri);
        self.nodes.remove(&key);
        self.entries.insert(key, CacheEntry::Invalidated);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

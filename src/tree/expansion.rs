//! Persisted expand/collapse state of a view, keyed by node uri.

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ExpansionState {
    path: Option<PathBuf>,
    expanded: BTreeMap<String, bool>,
}

impl ExpansionState {
    /// State that lives only as long as the view.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `<state_dir>/<view>.collapseState.json`. A missing file is an empty state.
    pub fn for_view(state_dir: &Path, view_name: &str) -> Result<Self, StorageError> {
        let path = state_dir.join(format!("{}.collapseState.json", view_name));
        let expanded = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::ParseError {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        Ok(Self {
            path: Some(path),
            expanded,
        })
    }

    pub fn is_expanded(&self, uri: &Path) -> Option<bool> {
        self.expanded.get(&key(uri)).copied()
    }

    pub fn set(&mut self, uri: &Path, expanded: bool) -> Result<(), StorageError> {
        self.expanded.insert(key(uri), expanded);
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let json = serde_json::to_string(&self.expanded)?;
        std::fs::write(path, json).map_err(|e| StorageError::io(path, e))
    }
}

fn key(uri: &Path) -> String {
    crate::tree::path::normalize(uri).to_string_lossy().into_owned()
}

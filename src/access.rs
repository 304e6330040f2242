//! Remembers which fragment was opened last, overall and per container.

use crate::tree::path::normalize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct FileAccessLog {
    last: Option<PathBuf>,
    by_container: HashMap<PathBuf, PathBuf>,
}

impl FileAccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accessed(&self) -> Option<&Path> {
        self.last.as_deref()
    }

    pub fn last_in(&self, container: &Path) -> Option<&Path> {
        self.by_container.get(&normalize(container)).map(PathBuf::as_path)
    }

    /// Record `fragment` as opened, optionally inside `container`.
    pub fn record(&mut self, container: Option<&Path>, fragment: &Path) {
        let fragment = normalize(fragment);
        if let Some(container) = container {
            self.by_container.insert(normalize(container), fragment.clone());
        }
        self.last = Some(fragment);
    }

    /// Drop every reference to `uri` or anything below it.
    pub fn forget(&mut self, uri: &Path) {
        let uri = normalize(uri);
        self.by_container
            .retain(|container, fragment| !container.starts_with(&uri) && !fragment.starts_with(&uri));
        if self.last.as_ref().map(|last| last.starts_with(&uri)).unwrap_or(false) {
            self.last = None;
        }
    }
}

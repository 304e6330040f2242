//! One-level directory listing.

use crate::error::TreeError;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// List the direct children of `dir`, sorted by name. Symlinks are not followed.
pub fn list_entries(dir: &Path) -> Result<Vec<DirEntryInfo>, TreeError> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| TreeError::UnreadableDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Skipping non UTF8 entry {:?}", entry.path());
                continue;
            }
        };
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            continue;
        };
        entries.push(DirEntryInfo { name, kind });
    }

    Ok(entries)
}

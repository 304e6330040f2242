//! Recycling bin log.
//!
//! Nothing is ever deleted. Removed resources are renamed into `data/recycling`
//! and described by an append-only JSON array in `data/recycling/.log`.

use crate::error::StorageError;
use crate::types::ResourceType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One recycled resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycleRecord {
    pub old_uri: String,
    pub recycle_bin_name: String,
    pub delete_timestamp: i64,
    pub resource_type: ResourceType,
    /// Only recorded for fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Handle on a project's recycling log file.
pub struct RecycleLog {
    path: PathBuf,
}

impl RecycleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing or empty log reads as no records.
    pub fn read(&self) -> Result<Vec<RecycleRecord>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::ParseError {
            path: self.path.clone(),
            source,
        })
    }

    /// Append records to the end of the log.
    pub fn append(&self, records: &[RecycleRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut log = match self.read() {
            Ok(log) => log,
            Err(StorageError::ParseError { path, source }) => {
                tracing::warn!(
                    "Recycling log {} is unreadable ({}); starting a new log",
                    path.display(),
                    source
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        log.extend_from_slice(records);
        let json = serde_json::to_string(&log)?;
        std::fs::write(&self.path, json).map_err(|e| StorageError::io(&self.path, e))
    }
}

/// Unique name for an entry inside the recycling directory.
pub fn recycle_bin_name(resource_type: ResourceType, timestamp: i64) -> String {
    format!(
        "deleted-{}-{}-{}",
        resource_type,
        timestamp,
        uuid::Uuid::new_v4().simple()
    )
}

//! Removal: resources are renamed into the recycling bin and logged, never deleted.

use super::{OutlineNode, OutlineView};
use crate::error::{ApiError, StorageError};
use crate::store::recycling::recycle_bin_name;
use crate::store::{self, RecycleLog, RecycleRecord};
use crate::tree::walker::list_entries;
use crate::tree::TreeNode;
use crate::types::{ResourceType, DATA_DIR, RECYCLING_DIR, RECYCLING_LOG};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

impl OutlineView {
    pub fn recycling_dir(&self) -> PathBuf {
        self.root().join(DATA_DIR).join(RECYCLING_DIR)
    }

    pub fn recycle_log(&self) -> RecycleLog {
        RecycleLog::new(self.recycling_dir().join(RECYCLING_LOG))
    }

    /// Recycle `targets` after one confirmation covering the whole batch.
    ///
    /// Only the local roots of the selection are processed. A container target
    /// recycles its contents and keeps the container itself. Returns the records
    /// appended to the recycling log; empty when declined or nothing was selected.
    pub fn remove_resources<F>(
        &mut self,
        targets: &[Arc<OutlineNode>],
        confirm: F,
    ) -> Result<Vec<RecycleRecord>, ApiError>
    where
        F: FnOnce(&[Arc<OutlineNode>]) -> bool,
    {
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let roots = self.local_roots(targets);
        if !confirm(&roots) {
            info!("Removal of {} resources declined", roots.len());
            return Ok(Vec::new());
        }

        let result = self.recycle_all(&roots);
        self.refresh_after(result)
    }

    fn recycle_all(&self, roots: &[Arc<OutlineNode>]) -> Result<Vec<RecycleRecord>, ApiError> {
        let recycling = self.recycling_dir();
        std::fs::create_dir_all(&recycling).map_err(|e| StorageError::io(&recycling, e))?;
        let log = self.recycle_log();

        let mut all = Vec::new();
        for target in roots {
            let records = match target.resource_type() {
                ResourceType::Fragment | ResourceType::Chapter | ResourceType::Snip => {
                    vec![self.recycle_node(target, &recycling)?]
                }
                ResourceType::Container => self.clear_container(target, &recycling)?,
                ResourceType::Root => {
                    return Err(ApiError::InvariantViolation(
                        "the root cannot be removed".to_string(),
                    ))
                }
            };
            log.append(&records)?;
            self.context()
                .access
                .lock()
                .forget(&target.uri(self.root()));
            all.extend(records);
        }
        Ok(all)
    }

    fn recycle_node(&self, node: &OutlineNode, recycling: &Path) -> Result<RecycleRecord, ApiError> {
        let title = node.shift_trailing_nodes_down(self)?;
        let kind = node.resource_type();
        let old_uri = node.uri(self.root());
        let timestamp = chrono::Utc::now().timestamp_millis();
        let bin_name = recycle_bin_name(kind, timestamp);
        move_into_bin(&old_uri, &recycling.join(&bin_name))?;

        info!("Recycled {} '{}' as {}", kind, title, bin_name);
        Ok(RecycleRecord {
            old_uri: old_uri.to_string_lossy().into_owned(),
            recycle_bin_name: bin_name,
            delete_timestamp: timestamp,
            resource_type: kind,
            title: (kind == ResourceType::Fragment).then_some(title),
        })
    }

    /// Recycle every directory inside `container` and reset its ordering store.
    fn clear_container(
        &self,
        container: &OutlineNode,
        recycling: &Path,
    ) -> Result<Vec<RecycleRecord>, ApiError> {
        let dir = container.uri(self.root());
        store::update(self.context().store.as_ref(), &dir, |cfg| cfg.clear_siblings())?;

        let mut records = Vec::new();
        for entry in list_entries(&dir)?.into_iter().filter(|e| e.is_dir()) {
            let old_uri = dir.join(&entry.name);
            let timestamp = chrono::Utc::now().timestamp_millis();
            let bin_name = recycle_bin_name(ResourceType::Container, timestamp);
            move_into_bin(&old_uri, &recycling.join(&bin_name))?;
            records.push(RecycleRecord {
                old_uri: old_uri.to_string_lossy().into_owned(),
                recycle_bin_name: bin_name,
                delete_timestamp: timestamp,
                resource_type: ResourceType::Container,
                title: None,
            });
        }
        if records.is_empty() {
            warn!("Container {} was already empty", dir.display());
        } else {
            info!("Recycled {} entries of {}", records.len(), dir.display());
        }
        Ok(records)
    }
}

fn move_into_bin(from: &Path, to: &Path) -> Result<(), StorageError> {
    std::fs::rename(from, to).map_err(|e| StorageError::io(from, e))
}

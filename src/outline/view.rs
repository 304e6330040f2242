//! Presentation and file-access tracking for the outline view.

use super::{OutlineNode, OutlineView};
use crate::tree::{ItemCommand, TreeItem, TreeNode};
use crate::types::ResourceType;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OPEN_FILE_COMMAND: &str = "folio.openFile";

pub(super) fn decorate(node: &OutlineNode, item: &mut TreeItem) {
    match node.resource_type() {
        ResourceType::Fragment => {
            item.context_value = Some("file".to_string());
            item.icon = Some("edit".to_string());
            item.command = Some(ItemCommand {
                command: OPEN_FILE_COMMAND.to_string(),
                title: "Open File".to_string(),
                arguments: vec![serde_json::Value::String(
                    item.resource_uri.to_string_lossy().into_owned(),
                )],
            });
        }
        ResourceType::Container => {
            item.context_value = Some("container".to_string());
            item.icon = Some("folder-library".to_string());
        }
        ResourceType::Chapter | ResourceType::Snip | ResourceType::Root => {
            item.context_value = Some("dir".to_string());
            item.icon = Some("folder".to_string());
        }
    }
}

impl OutlineView {
    /// Track a fragment the user opened. Anything else is ignored.
    pub fn document_opened(&self, uri: &Path) {
        let Some(node) = self.lookup_by_uri(uri) else {
            debug!("Opened document {} is not part of the outline", uri.display());
            return;
        };
        if node.resource_type() != ResourceType::Fragment {
            return;
        }

        let mut current = self.parent_of(&node);
        while let Some(ancestor) = current {
            if ancestor.resource_type() == ResourceType::Container {
                let container_uri = ancestor.uri(self.root());
                self.context()
                    .access
                    .lock()
                    .record(Some(&container_uri), uri);
                return;
            }
            current = self.parent_of(&ancestor);
        }
        self.context().access.lock().record(None, uri);
    }

    /// Fragment last opened inside `container`.
    ///
    /// When nothing was opened there yet, falls back to the last fragment of the
    /// container's last item and remembers it.
    pub fn container_last_accessed(&self, container: &OutlineNode) -> Option<PathBuf> {
        let container_uri = container.uri(self.root());
        let logged = self
            .context()
            .access
            .lock()
            .last_in(&container_uri)
            .map(Path::to_path_buf);
        if let Some(logged) = logged {
            if self.lookup_by_uri(&logged).is_some() {
                return Some(logged);
            }
        }

        let last_item = container.structural_children().pop()?;
        let fragment = last_item
            .structural_children()
            .into_iter()
            .filter(|child| child.resource_type() == ResourceType::Fragment)
            .last()?;
        let fragment_uri = fragment.uri(self.root());
        self.context()
            .access
            .lock()
            .record(Some(&container_uri), &fragment_uri);
        Some(fragment_uri)
    }

    /// Last opened fragment anywhere in the project.
    pub fn last_accessed(&self) -> Option<PathBuf> {
        self.context()
            .access
            .lock()
            .last_accessed()
            .map(Path::to_path_buf)
    }
}

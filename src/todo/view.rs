use super::cache::CacheEntry;
use super::node::TodoNode;
use super::scan::TodoSpan;
use crate::error::ApiError;
use crate::tree::{TreeNode, TreeProvider};
use crate::types::ResourceType;
use std::path::Path;
use tracing::debug;

pub const TODO_VIEW: &str = "todo";
pub const OPEN_TODO_COMMAND: &str = "folio.openTodo";

pub type TodosView = TreeProvider<TodoNode>;

impl TodosView {
    /// React to an edit of `uri`.
    ///
    /// Invalidates the node and every ancestor up to the root, then signals
    /// listeners without a rebuild. An unknown uri invalidates everything.
    pub fn update(&mut self, uri: &Path) -> Result<(), ApiError> {
        let Some(mut node) = self.lookup_by_uri(uri) else {
            debug!("{} is not in the TODO tree; invalidating everything", uri.display());
            return self.invalidate_all();
        };

        loop {
            self.context().cache.lock().invalidate(&node.uri(self.root()));
            if node.ids().resource_type == ResourceType::Root {
                break;
            }
            match self.parent_of(&node) {
                Some(parent) => node = parent,
                None => break,
            }
        }

        self.notify_changed();
        Ok(())
    }

    /// Clear the whole cache and rebuild.
    pub fn invalidate_all(&mut self) -> Result<(), ApiError> {
        self.context().cache.lock().invalidate_all();
        self.refresh()
    }

    /// TODOs of every fragment under `uri`, by fragment path and in display order.
    pub fn todos_under(&self, uri: &Path) -> Result<Vec<(std::path::PathBuf, Vec<TodoSpan>)>, ApiError> {
        let start = self
            .lookup_by_uri(uri)
            .ok_or_else(|| ApiError::NodeNotFound(uri.display().to_string()))?;
        let mut found = Vec::new();
        let mut pending = vec![start];
        while let Some(node) = pending.pop() {
            if node.todo_count(self)? == 0 {
                continue;
            }
            let children = node.children(self)?;
            if node.ids().resource_type == ResourceType::Fragment {
                let spans = children.iter().filter_map(|c| c.span().cloned()).collect();
                found.push((node.uri(self.root()), spans));
            } else {
                pending.extend(children.into_iter().rev());
            }
        }
        Ok(found)
    }

    /// Cache state of `uri`, for hosts that want to show staleness.
    pub fn cache_entry(&self, uri: &Path) -> Option<CacheEntry> {
        self.context().cache.lock().entry(uri).cloned()
    }
}

//! Outline view: the full project tree with structural mutations.

pub mod create;
pub mod moves;
pub mod remove;
pub mod rename;
pub mod reorder;
pub mod view;

pub use create::CreateOptions;

use crate::access::FileAccessLog;
use crate::error::ApiError;
use crate::store::{self, OrderingStore};
use crate::tree::{NodeData, NodeModel, TreeBuilder, TreeItem, TreeNode, TreeProvider};
use crate::tree::provider::MoveOutcome;
use crate::types::{Ids, ResourceType, CHAPTERS_DIR};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// View name used for persisted state.
pub const OUTLINE_VIEW: &str = "outline";

pub type OutlineView = TreeProvider<OutlineNode>;

/// Shared state of the outline view.
pub struct OutlineContext {
    pub store: Arc<dyn OrderingStore>,
    pub access: Mutex<FileAccessLog>,
}

impl OutlineContext {
    pub fn new(store: Arc<dyn OrderingStore>) -> Self {
        Self {
            store,
            access: Mutex::new(FileAccessLog::new()),
        }
    }
}

#[derive(Debug)]
pub struct OutlineNode {
    pub data: NodeModel<OutlineNode>,
}

impl OutlineNode {
    pub fn resource_type(&self) -> ResourceType {
        self.data.ids.resource_type
    }

    /// The fixed chapters container directly under the root.
    pub fn is_chapters_container(&self) -> bool {
        self.resource_type() == ResourceType::Container
            && self.data.ids.parent_type_id == ResourceType::Root
            && self.data.ids.file_name == CHAPTERS_DIR
    }

    /// Snips container of a root or chapter node.
    pub fn snips_container(&self) -> Result<Arc<OutlineNode>, ApiError> {
        match &self.data.data {
            NodeData::Root { snips, .. } | NodeData::Chapter { snips, .. } => Ok(snips.clone()),
            _ => Err(ApiError::InvariantViolation(format!(
                "{} '{}' has no snips container",
                self.resource_type(),
                self.data.ids.display
            ))),
        }
    }

    /// Chapters container of the root node.
    pub fn chapters_container(&self) -> Result<Arc<OutlineNode>, ApiError> {
        match &self.data.data {
            NodeData::Root { chapters, .. } => Ok(chapters.clone()),
            _ => Err(ApiError::InvariantViolation(format!(
                "{} '{}' is not the root",
                self.resource_type(),
                self.data.ids.display
            ))),
        }
    }

    /// Nearest node, starting with this one, that is either of type `secondary`
    /// or a chapter.
    pub fn container_parent(
        &self,
        view: &OutlineView,
        secondary: ResourceType,
    ) -> Result<Arc<OutlineNode>, ApiError> {
        let mut current = view
            .lookup_by_id(self.id())
            .ok_or_else(|| ApiError::NodeNotFound(self.data.ids.relative_uri()))?;
        loop {
            let kind = current.resource_type();
            if kind == secondary || kind == ResourceType::Chapter {
                return Ok(current);
            }
            current = view.parent_of(&current).ok_or_else(|| {
                ApiError::InvariantViolation(format!(
                    "no {} or chapter above {}",
                    secondary,
                    self.data.ids.relative_uri()
                ))
            })?;
        }
    }

    /// Directory of the ordering store holding this node's record.
    ///
    /// Containers own the store of their own directory. Every other node is
    /// recorded in its parent's directory. The root has no store.
    pub fn store_dir(&self, view: &OutlineView) -> Result<PathBuf, ApiError> {
        match self.resource_type() {
            ResourceType::Root => Err(ApiError::InvalidTarget(
                "the root has no ordering store".to_string(),
            )),
            ResourceType::Container => Ok(self.uri(view.root())),
            _ => {
                let parent = view
                    .parent_of(self)
                    .ok_or_else(|| ApiError::NodeNotFound(self.data.ids.relative_uri()))?;
                Ok(parent.uri(view.root()))
            }
        }
    }

    /// Remove this node's record and close the gap it leaves. Returns the
    /// removed title, or the file name when there was no record.
    pub fn shift_trailing_nodes_down(&self, view: &OutlineView) -> Result<String, ApiError> {
        let dir = self.store_dir(view)?;
        let name = &self.data.ids.file_name;
        let removed = store::update(view.context().store.as_ref(), &dir, |cfg| {
            cfg.shift_trailing_down(name)
        })?;
        Ok(match removed {
            Some(entry) => entry.title,
            None => {
                warn!("No ordering record for {} in {}", name, dir.display());
                name.clone()
            }
        })
    }
}

impl TreeNode for OutlineNode {
    type Context = OutlineContext;

    fn initialize_tree(root: &Path, cx: &OutlineContext) -> Result<Arc<Self>, ApiError> {
        TreeBuilder::new(root, cx.store.as_ref()).build(|data| OutlineNode { data })
    }

    fn ids(&self) -> &Ids {
        &self.data.ids
    }

    fn has_children(&self) -> bool {
        self.resource_type() != ResourceType::Fragment
    }

    fn structural_children(&self) -> Vec<Arc<Self>> {
        self.data.ordered_children()
    }

    fn tooltip(&self, _provider: &OutlineView) -> String {
        format!("{} | actual name: {}", self.resource_type(), self.data.ids.file_name)
    }

    fn decorate(&self, item: &mut TreeItem, _provider: &OutlineView) {
        view::decorate(self, item);
    }

    fn move_node(
        &self,
        target: &Self,
        provider: &OutlineView,
        offset: usize,
    ) -> Result<MoveOutcome, ApiError> {
        moves::move_node(self, target, provider, offset)
    }
}

/// Drag-and-drop allow-list: may a `mover` be dropped onto a `target`?
pub fn move_allowed(mover: ResourceType, target: ResourceType) -> bool {
    use ResourceType::*;
    match mover {
        Snip => matches!(target, Chapter | Fragment | Root | Container | Snip),
        Chapter => target == Chapter,
        Root => false,
        Container => matches!(target, Chapter | Root | Snip | Container | Fragment),
        Fragment => matches!(target, Chapter | Snip | Fragment),
    }
}

//! Generic tree provider shared by the outline and TODO views.
//!
//! A provider owns the current tree of one view. Each refresh discards it and
//! builds a new one, so internal ids never survive a refresh. Hosts receive
//! `TreeChange` events through registered listeners.

use crate::error::ApiError;
use crate::tree::expansion::ExpansionState;
use crate::tree::path::same_path;
use crate::types::Ids;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of a single-node move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The combination of mover and target is not allowed.
    Rejected,
    /// Moved; `offset` is added to the running offset of the batch.
    Moved { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapsible {
    None,
    Collapsed,
    Expanded,
}

/// Host command attached to an item, invoked on selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCommand {
    pub command: String,
    pub title: String,
    pub arguments: Vec<serde_json::Value>,
}

/// Presentation record for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    pub label: String,
    pub tooltip: String,
    pub collapsible: Collapsible,
    pub resource_uri: PathBuf,
    pub context_value: Option<String>,
    pub icon: Option<String>,
    pub command: Option<ItemCommand>,
}

/// Change notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub view_name: String,
    pub generation: u64,
    /// `false` when only derived data changed and the tree itself was kept.
    pub rebuilt: bool,
}

type Listener = Box<dyn Fn(&TreeChange) + Send + Sync>;

/// Capability set of a node type usable by `TreeProvider`.
pub trait TreeNode: Sized + Send + Sync + 'static {
    /// View-wide state shared by every node of the view.
    type Context: Send + Sync;

    fn initialize_tree(root: &Path, cx: &Self::Context) -> Result<Arc<Self>, ApiError>;

    fn ids(&self) -> &Ids;

    fn id(&self) -> &str {
        &self.ids().internal
    }

    fn parent_id(&self) -> &str {
        &self.ids().parent_internal_id
    }

    fn uri(&self, root: &Path) -> PathBuf {
        self.ids().uri(root)
    }

    fn has_children(&self) -> bool;

    /// Every child in display order, regardless of view filtering.
    fn structural_children(&self) -> Vec<Arc<Self>>;

    /// Children the view displays.
    fn children(&self, _provider: &TreeProvider<Self>) -> Result<Vec<Arc<Self>>, ApiError> {
        Ok(self.structural_children())
    }

    fn tooltip(&self, provider: &TreeProvider<Self>) -> String;

    /// View-specific additions to a freshly built item.
    fn decorate(&self, _item: &mut TreeItem, _provider: &TreeProvider<Self>) {}

    /// Move this node onto `target`.
    fn move_node(
        &self,
        target: &Self,
        provider: &TreeProvider<Self>,
        offset: usize,
    ) -> Result<MoveOutcome, ApiError>;

    /// Called before every rebuild.
    fn on_refresh(_cx: &Self::Context) {}
}

pub struct TreeProvider<N: TreeNode> {
    view_name: String,
    root: PathBuf,
    context: N::Context,
    tree: Option<Arc<N>>,
    registered: bool,
    expansion: ExpansionState,
    generation: u64,
    listeners: Vec<Listener>,
}

impl<N: TreeNode> TreeProvider<N> {
    pub fn new(
        view_name: impl Into<String>,
        root: impl Into<PathBuf>,
        context: N::Context,
        expansion: ExpansionState,
    ) -> Self {
        Self {
            view_name: view_name.into(),
            root: root.into(),
            context,
            tree: None,
            registered: false,
            expansion,
            generation: 0,
            listeners: Vec::new(),
        }
    }

    /// Build the first tree and register the view.
    pub fn init(&mut self) -> Result<(), ApiError> {
        self.registered = true;
        self.refresh()?;
        info!("View {} initialized for {}", self.view_name, self.root.display());
        Ok(())
    }

    /// Discard the current tree and rebuild it. A failed rebuild disables the view.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        if !self.registered {
            return Err(ApiError::ProviderDisabled(self.view_name.clone()));
        }
        N::on_refresh(&self.context);
        match N::initialize_tree(&self.root, &self.context) {
            Ok(tree) => {
                self.tree = Some(tree);
                self.generation += 1;
                debug!("View {} rebuilt (generation {})", self.view_name, self.generation);
                self.emit(true);
                Ok(())
            }
            Err(e) => {
                error!("View {} failed to rebuild, disabling it: {}", self.view_name, e);
                self.tree = None;
                self.registered = false;
                Err(e)
            }
        }
    }

    /// Refresh after a mutation, keeping the mutation's error if it failed.
    pub fn refresh_after<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.refresh()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(refresh_err) = self.refresh() {
                    warn!("Refresh after failed mutation also failed: {}", refresh_err);
                }
                Err(e)
            }
        }
    }

    /// Signal listeners without rebuilding the tree.
    pub fn notify_changed(&mut self) {
        if self.registered {
            self.emit(false);
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&TreeChange) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, rebuilt: bool) {
        let change = TreeChange {
            view_name: self.view_name.clone(),
            generation: self.generation,
            rebuilt,
        };
        for listener in &self.listeners {
            listener(&change);
        }
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn context(&self) -> &N::Context {
        &self.context
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current tree root.
    pub fn tree(&self) -> Result<&Arc<N>, ApiError> {
        match (&self.tree, self.registered) {
            (Some(tree), true) => Ok(tree),
            _ => Err(ApiError::ProviderDisabled(self.view_name.clone())),
        }
    }

    /// Children of `node`, or the root's children when `node` is `None`.
    pub fn get_children(&self, node: Option<&N>) -> Result<Vec<Arc<N>>, ApiError> {
        match node {
            Some(node) => node.children(self),
            None => {
                let tree = self.tree()?;
                tree.children(self)
            }
        }
    }

    pub fn get_tree_item(&self, node: &N) -> Result<TreeItem, ApiError> {
        self.tree()?;
        let resource_uri = node.uri(&self.root);
        let collapsible = if !node.has_children() {
            Collapsible::None
        } else {
            match self.expansion.is_expanded(&resource_uri) {
                Some(true) => Collapsible::Expanded,
                _ => Collapsible::Collapsed,
            }
        };
        let mut item = TreeItem {
            id: node.id().to_string(),
            label: node.ids().display.clone(),
            tooltip: node.tooltip(self),
            collapsible,
            resource_uri,
            context_value: None,
            icon: None,
            command: None,
        };
        node.decorate(&mut item, self);
        Ok(item)
    }

    /// Record that the host expanded or collapsed `node`.
    pub fn set_expanded(&mut self, node: &N, expanded: bool) -> Result<(), ApiError> {
        let uri = node.uri(&self.root);
        self.expansion.set(&uri, expanded)?;
        Ok(())
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Depth-first search by internal id.
    pub fn lookup_by_id(&self, id: &str) -> Option<Arc<N>> {
        let tree = self.tree().ok()?;
        find(tree, &|node: &N| node.id() == id)
    }

    /// Depth-first search by on-disk location.
    pub fn lookup_by_uri(&self, uri: &Path) -> Option<Arc<N>> {
        let tree = self.tree().ok()?;
        find(tree, &|node: &N| same_path(&node.uri(&self.root), uri))
    }

    pub fn parent_of(&self, node: &N) -> Option<Arc<N>> {
        self.lookup_by_id(node.parent_id())
    }

    /// Nodes of `nodes` with no ancestor in `nodes`.
    pub fn local_roots(&self, nodes: &[Arc<N>]) -> Vec<Arc<N>> {
        let selected: HashSet<&str> = nodes.iter().map(|n| n.id()).collect();
        nodes
            .iter()
            .filter(|node| {
                let mut current = self.parent_of(node);
                while let Some(ancestor) = current {
                    if selected.contains(ancestor.id()) {
                        return false;
                    }
                    current = self.parent_of(&ancestor);
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Drag-and-drop of `moved` onto `target` (the root when `None`).
    ///
    /// Movers already directly under the target are skipped. Returns the number
    /// of nodes that moved; the tree is rebuilt whenever anything was attempted.
    pub fn handle_drop(&mut self, target: Option<Arc<N>>, moved: &[Arc<N>]) -> Result<usize, ApiError> {
        let target = match target {
            Some(target) => target,
            None => self.tree()?.clone(),
        };
        let movers: Vec<Arc<N>> = self
            .local_roots(moved)
            .into_iter()
            .filter(|mover| mover.parent_id() != target.id())
            .collect();
        if movers.is_empty() {
            return Ok(0);
        }

        let result = self.move_all(&target, &movers);
        self.refresh_after(result)
    }

    fn move_all(&self, target: &N, movers: &[Arc<N>]) -> Result<usize, ApiError> {
        let mut offset = 0;
        let mut moved = 0;
        for mover in movers {
            match mover.move_node(target, self, offset)? {
                MoveOutcome::Moved { offset: step } => {
                    offset += step;
                    moved += 1;
                }
                MoveOutcome::Rejected => {
                    warn!(
                        "Cannot move {} '{}' onto {} '{}'",
                        mover.ids().resource_type,
                        mover.ids().display,
                        target.ids().resource_type,
                        target.ids().display
                    );
                }
            }
        }
        Ok(moved)
    }
}

fn find<N: TreeNode>(node: &Arc<N>, matches: &dyn Fn(&N) -> bool) -> Option<Arc<N>> {
    if matches(node) {
        return Some(node.clone());
    }
    node.structural_children()
        .iter()
        .find_map(|child| find(child, matches))
}

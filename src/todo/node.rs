//! Nodes of the TODO view.

use super::cache::TodoCache;
use super::scan::{scan_fragment, TodoSpan};
use super::view::{TodosView, OPEN_TODO_COMMAND};
use crate::error::ApiError;
use crate::store::OrderingStore;
use crate::tree::{
    Collapsible, ItemCommand, MoveOutcome, NodeData, NodeModel, TreeBuilder, TreeItem, TreeNode,
};
use crate::types::{fresh_internal_id, Ids, ResourceType};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub struct TodoContext {
    pub store: Arc<dyn OrderingStore>,
    pub cache: Mutex<TodoCache>,
}

impl TodoContext {
    pub fn new(store: Arc<dyn OrderingStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(TodoCache::new()),
        }
    }
}

#[derive(Debug)]
pub enum TodoNode {
    /// Mirror of an outline node.
    Tree(NodeModel<TodoNode>),
    /// One TODO inside a fragment. Counts as one and has no children.
    Span { ids: Ids, span: TodoSpan },
}

impl TodoNode {
    pub fn span(&self) -> Option<&TodoSpan> {
        match self {
            TodoNode::Span { span, .. } => Some(span),
            TodoNode::Tree(_) => None,
        }
    }

    /// Number of TODOs at or below this node, computed through the cache.
    pub fn todo_count(&self, view: &TodosView) -> Result<usize, ApiError> {
        let model = match self {
            TodoNode::Span { .. } => return Ok(1),
            TodoNode::Tree(model) => model,
        };
        let uri = model.ids.uri(view.root());
        let cached = view.context().cache.lock().count(&uri);
        if let Some(count) = cached {
            return Ok(count);
        }

        let count = match &model.data {
            NodeData::Root { chapters, snips } => chapters.todo_count(view)? + snips.todo_count(view)?,
            NodeData::Container { contents } => sum_counts(contents, view)?,
            NodeData::Chapter { text_data, snips } => {
                sum_counts(text_data, view)? + snips.todo_count(view)?
            }
            NodeData::Snip { text_data } => sum_counts(text_data, view)?,
            NodeData::Fragment => {
                let todos = scan_fragment(&uri)?;
                let count = todos.len();
                view.context().cache.lock().set_todos(&uri, todos);
                return Ok(count);
            }
        };
        view.context().cache.lock().set_count(&uri, count);
        Ok(count)
    }

    /// Span nodes of a fragment, created once per validated scan.
    fn span_nodes(&self, model: &NodeModel<TodoNode>, view: &TodosView) -> Result<Vec<Arc<TodoNode>>, ApiError> {
        let uri = model.ids.uri(view.root());
        let cached = view.context().cache.lock().nodes(&uri);
        if let Some(nodes) = cached {
            return Ok(nodes);
        }

        self.todo_count(view)?;
        let todos = view.context().cache.lock().todos(&uri).unwrap_or_default();
        let nodes: Vec<Arc<TodoNode>> = todos
            .into_iter()
            .enumerate()
            .map(|(idx, span)| {
                Arc::new(TodoNode::Span {
                    ids: Ids {
                        resource_type: ResourceType::Fragment,
                        display: span.preview.clone(),
                        internal: fresh_internal_id(),
                        relative_path: model.ids.relative_path.clone(),
                        file_name: model.ids.file_name.clone(),
                        parent_type_id: ResourceType::Fragment,
                        parent_internal_id: model.ids.internal.clone(),
                        ordering: idx as i64,
                    },
                    span,
                })
            })
            .collect();
        view.context().cache.lock().set_nodes(&uri, nodes.clone());
        Ok(nodes)
    }
}

fn sum_counts(nodes: &[Arc<TodoNode>], view: &TodosView) -> Result<usize, ApiError> {
    nodes.iter().try_fold(0, |total, node| Ok(total + node.todo_count(view)?))
}

impl TreeNode for TodoNode {
    type Context = TodoContext;

    fn initialize_tree(root: &Path, cx: &TodoContext) -> Result<Arc<Self>, ApiError> {
        TreeBuilder::new(root, cx.store.as_ref()).build(TodoNode::Tree)
    }

    fn ids(&self) -> &Ids {
        match self {
            TodoNode::Tree(model) => &model.ids,
            TodoNode::Span { ids, .. } => ids,
        }
    }

    fn has_children(&self) -> bool {
        matches!(self, TodoNode::Tree(_))
    }

    fn structural_children(&self) -> Vec<Arc<Self>> {
        match self {
            TodoNode::Tree(model) => model.ordered_children(),
            TodoNode::Span { .. } => Vec::new(),
        }
    }

    /// Only children holding at least one TODO; fragments list their spans.
    fn children(&self, provider: &TodosView) -> Result<Vec<Arc<Self>>, ApiError> {
        let model = match self {
            TodoNode::Span { .. } => return Ok(Vec::new()),
            TodoNode::Tree(model) => model,
        };
        if let NodeData::Fragment = model.data {
            return self.span_nodes(model, provider);
        }
        let mut children = Vec::new();
        for child in model.ordered_children() {
            if child.todo_count(provider)? > 0 {
                children.push(child);
            }
        }
        Ok(children)
    }

    fn tooltip(&self, provider: &TodosView) -> String {
        let count = self
            .todo_count(provider)
            .map(|count| count.to_string())
            .unwrap_or_else(|_| "?".to_string());
        format!("{} | TODOs: {}", self.ids().resource_type, count)
    }

    fn decorate(&self, item: &mut TreeItem, _provider: &TodosView) {
        match self {
            TodoNode::Span { span, .. } => {
                item.context_value = Some("file".to_string());
                item.icon = Some("pass".to_string());
                item.command = Some(ItemCommand {
                    command: OPEN_TODO_COMMAND.to_string(),
                    title: "Open TODO".to_string(),
                    arguments: vec![
                        serde_json::Value::String(item.resource_uri.to_string_lossy().into_owned()),
                        serde_json::to_value(span).unwrap_or(serde_json::Value::Null),
                    ],
                });
            }
            TodoNode::Tree(model) => match model.data.resource_type() {
                ResourceType::Fragment => {
                    item.context_value = Some("dir".to_string());
                    item.icon = Some("edit".to_string());
                    item.collapsible = Collapsible::Expanded;
                }
                ResourceType::Container => {
                    item.context_value = Some("container".to_string());
                    item.icon = Some("folder-library".to_string());
                }
                _ => {
                    item.context_value = Some("dir".to_string());
                    item.icon = Some("folder".to_string());
                }
            },
        }
    }

    fn move_node(&self, _target: &Self, _provider: &TodosView, _offset: usize) -> Result<MoveOutcome, ApiError> {
        warn!("Nodes cannot be moved within the TODO tree; use the outline instead");
        Ok(MoveOutcome::Rejected)
    }

    fn on_refresh(cx: &TodoContext) {
        cx.cache.lock().invalidate_all();
    }
}

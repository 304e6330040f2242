//! Node model: a closed set of variants forming the outline.

use crate::tree::provider::TreeNode;
use crate::types::{Ids, ResourceType};
use std::sync::Arc;

/// Structural payload of a node, generic over the view's node type.
///
/// Children are owned through `Arc` so that views can hand out cheap handles.
/// Parents are never referenced directly; `Ids::parent_internal_id` is resolved
/// through the provider instead.
#[derive(Debug)]
pub enum NodeData<N> {
    Root { chapters: Arc<N>, snips: Arc<N> },
    Container { contents: Vec<Arc<N>> },
    Chapter { text_data: Vec<Arc<N>>, snips: Arc<N> },
    Snip { text_data: Vec<Arc<N>> },
    Fragment,
}

impl<N> NodeData<N> {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            NodeData::Root { .. } => ResourceType::Root,
            NodeData::Container { .. } => ResourceType::Container,
            NodeData::Chapter { .. } => ResourceType::Chapter,
            NodeData::Snip { .. } => ResourceType::Snip,
            NodeData::Fragment => ResourceType::Fragment,
        }
    }
}

/// Identity plus structure: what the builder hands to a view's constructor.
#[derive(Debug)]
pub struct NodeModel<N> {
    pub ids: Ids,
    pub data: NodeData<N>,
}

impl<N: TreeNode> NodeModel<N> {
    /// Children in display order.
    ///
    /// Chapters list their fragments by ordering followed by their snips
    /// container; roots list the chapters container then the work snips.
    pub fn ordered_children(&self) -> Vec<Arc<N>> {
        match &self.data {
            NodeData::Root { chapters, snips } => vec![chapters.clone(), snips.clone()],
            NodeData::Container { contents } => sorted(contents),
            NodeData::Chapter { text_data, snips } => {
                let mut children = sorted(text_data);
                children.push(snips.clone());
                children
            }
            NodeData::Snip { text_data } => sorted(text_data),
            NodeData::Fragment => Vec::new(),
        }
    }
}

/// Copy of `nodes` sorted by `ids.ordering`.
pub fn sorted<N: TreeNode>(nodes: &[Arc<N>]) -> Vec<Arc<N>> {
    let mut nodes = nodes.to_vec();
    nodes.sort_by_key(|node| node.ids().ordering);
    nodes
}

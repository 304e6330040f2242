//! Moving siblings up or down within their parent.

use super::{OutlineNode, OutlineView};
use crate::error::ApiError;
use crate::store::{self, ReorderDirection};
use crate::tree::TreeNode;
use crate::types::ResourceType;
use std::sync::Arc;
use tracing::debug;

impl OutlineView {
    pub fn move_up(&mut self, resource: &OutlineNode, selection: &[Arc<OutlineNode>]) -> Result<bool, ApiError> {
        self.reorder(resource, selection, ReorderDirection::Up)
    }

    pub fn move_down(&mut self, resource: &OutlineNode, selection: &[Arc<OutlineNode>]) -> Result<bool, ApiError> {
        self.reorder(resource, selection, ReorderDirection::Down)
    }

    /// Move `resource` and the selected nodes sharing its parent one slot as a block.
    /// Returns `false` when nothing moved.
    fn reorder(
        &mut self,
        resource: &OutlineNode,
        selection: &[Arc<OutlineNode>],
        direction: ReorderDirection,
    ) -> Result<bool, ApiError> {
        if matches!(
            resource.resource_type(),
            ResourceType::Root | ResourceType::Container
        ) {
            debug!("{} nodes have a fixed position", resource.resource_type());
            return Ok(false);
        }

        let mut targets: Vec<String> = selection
            .iter()
            .filter(|node| node.parent_id() == resource.parent_id() && node.id() != resource.id())
            .map(|node| node.ids().file_name.clone())
            .collect();
        targets.push(resource.ids().file_name.clone());

        let result = resource.store_dir(self).and_then(|dir| {
            store::update(self.context().store.as_ref(), &dir, |cfg| {
                cfg.reorder_block(&targets, direction)
            })
            .map_err(ApiError::from)
        });
        self.refresh_after(result)
    }
}

//! Title changes. File names never change.

use super::{OutlineNode, OutlineView};
use crate::error::ApiError;
use crate::store::{self, OrderEntry};
use crate::tree::TreeNode;
use crate::types::ResourceType;
use tracing::{info, warn};

impl OutlineView {
    /// Set the display title of a chapter, snip or fragment.
    ///
    /// A node without a record gets one at the end of its siblings.
    pub fn rename_resource(&mut self, node: &OutlineNode, new_title: &str) -> Result<(), ApiError> {
        let result = self.write_title(node, new_title);
        self.refresh_after(result)
    }

    fn write_title(&self, node: &OutlineNode, new_title: &str) -> Result<(), ApiError> {
        if matches!(
            node.resource_type(),
            ResourceType::Root | ResourceType::Container
        ) {
            return Err(ApiError::InvalidTarget(format!(
                "{} '{}' cannot be renamed",
                node.resource_type(),
                node.ids().display
            )));
        }
        let dir = node.store_dir(self)?;
        let name = node.ids().file_name.clone();
        let previous = store::update(self.context().store.as_ref(), &dir, |cfg| {
            match cfg.get_mut(&name) {
                Some(entry) => Some(std::mem::replace(&mut entry.title, new_title.to_string())),
                None => {
                    let ordering = cfg.next_ordering();
                    cfg.insert(name.clone(), OrderEntry::new(new_title, ordering));
                    None
                }
            }
        })?;
        match previous {
            Some(previous) => info!("Renamed '{}' to '{}'", previous, new_title),
            None => warn!(
                "{} had no ordering record in {}; created one titled '{}'",
                name,
                dir.display(),
                new_title
            ),
        }
        Ok(())
    }
}

//! Drag-and-drop moves between and within containers.

use super::{move_allowed, OutlineNode, OutlineView};
use crate::error::{ApiError, StorageError};
use crate::store::{self, OrderEntry, OrderingStore};
use crate::tree::{MoveOutcome, TreeNode};
use crate::types::ResourceType;
use std::sync::Arc;
use tracing::{debug, info};

pub(super) fn move_node(
    mover: &OutlineNode,
    target: &OutlineNode,
    view: &OutlineView,
    offset: usize,
) -> Result<MoveOutcome, ApiError> {
    if !move_allowed(mover.resource_type(), target.resource_type()) {
        return Ok(MoveOutcome::Rejected);
    }

    if mover.resource_type() == ResourceType::Container {
        return move_container_contents(mover, target, view);
    }

    let destination = destination_for(mover, target, view)?;
    if destination.id() == mover.parent_id() {
        reorder_within(mover, target, &destination, view, offset)
    } else {
        transfer(mover, &destination, view)?;
        Ok(MoveOutcome::Moved { offset: 0 })
    }
}

/// Chapter, snip or snips container that receives `mover` when dropped on `target`.
fn destination_for(
    mover: &OutlineNode,
    target: &OutlineNode,
    view: &OutlineView,
) -> Result<Arc<OutlineNode>, ApiError> {
    match mover.resource_type() {
        ResourceType::Chapter => view.tree()?.chapters_container(),
        ResourceType::Snip => match target.resource_type() {
            ResourceType::Root | ResourceType::Chapter => target.snips_container(),
            _ => target
                .container_parent(view, ResourceType::Root)?
                .snips_container(),
        },
        ResourceType::Fragment => match target.resource_type() {
            ResourceType::Chapter | ResourceType::Snip => view
                .lookup_by_id(target.id())
                .ok_or_else(|| ApiError::NodeNotFound(target.ids().relative_uri())),
            _ => target.container_parent(view, ResourceType::Snip),
        },
        other => Err(ApiError::InvariantViolation(format!(
            "{} nodes have no move destination",
            other
        ))),
    }
}

/// Reposition `mover` next to the child of `destination` that holds `target`.
fn reorder_within(
    mover: &OutlineNode,
    target: &OutlineNode,
    destination: &OutlineNode,
    view: &OutlineView,
    offset: usize,
) -> Result<MoveOutcome, ApiError> {
    let Some(anchor) = sibling_anchor(target, destination, view) else {
        debug!(
            "Drop target '{}' is not inside '{}'; nothing to reorder",
            target.ids().display,
            destination.ids().display
        );
        return Ok(MoveOutcome::Moved { offset: 0 });
    };

    let dir = destination.uri(view.root());
    let mover_name = mover.ids().file_name.clone();
    let anchor_name = anchor.ids().file_name.clone();
    let step = store::update(view.context().store.as_ref(), &dir, |cfg| {
        cfg.reposition(&mover_name, &anchor_name, offset)
    })?;
    Ok(MoveOutcome::Moved {
        offset: step.unwrap_or(0),
    })
}

/// `target` itself or its ancestor directly below `destination`.
fn sibling_anchor(
    target: &OutlineNode,
    destination: &OutlineNode,
    view: &OutlineView,
) -> Option<Arc<OutlineNode>> {
    let mut current = view.lookup_by_id(target.id())?;
    loop {
        if current.parent_id() == destination.id() {
            return Some(current);
        }
        if current.resource_type() == ResourceType::Root {
            return None;
        }
        current = view.parent_of(&current)?;
    }
}

/// Move the file or directory of `mover` into `destination`, appending it there.
fn transfer(mover: &OutlineNode, destination: &OutlineNode, view: &OutlineView) -> Result<(), ApiError> {
    let store = view.context().store.clone();
    let destination_dir = destination.uri(view.root());
    // Fail before touching the source when the destination has no store.
    store.read(&destination_dir)?;

    let title = mover.shift_trailing_nodes_down(view)?;
    let name = mover.ids().file_name.clone();
    store::update(store.as_ref(), &destination_dir, |cfg| {
        let ordering = cfg.next_ordering();
        cfg.insert(name.clone(), OrderEntry::new(title.clone(), ordering));
    })?;

    let from = mover.uri(view.root());
    let to = destination_dir.join(&name);
    std::fs::rename(&from, &to).map_err(|e| StorageError::io(&from, e))?;
    info!(
        "Moved {} '{}' into '{}'",
        mover.resource_type(),
        title,
        destination.ids().display
    );
    Ok(())
}

/// Dropping a container moves each of its children, in order, onto `target`.
fn move_container_contents(
    container: &OutlineNode,
    target: &OutlineNode,
    view: &OutlineView,
) -> Result<MoveOutcome, ApiError> {
    let children = container.structural_children();
    let Some(first) = children.first() else {
        return Ok(MoveOutcome::Moved { offset: 0 });
    };
    if first.resource_type() == ResourceType::Chapter {
        return Ok(MoveOutcome::Rejected);
    }

    let mut offset = 0;
    for child in &children {
        if let MoveOutcome::Moved { offset: step } = move_node(child, target, view, offset)? {
            offset += step;
        }
    }
    Ok(MoveOutcome::Moved { offset })
}

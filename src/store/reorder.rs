//! Reordering within one ordering store.
//!
//! Both operations permute ordering values inside a contiguous span of the sorted
//! sibling list and reuse the values already present in that span, so the set of
//! records, their titles and every value outside the span stay untouched.

use super::DotConfig;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

impl DotConfig {
    /// Move a set of siblings one slot up or down as a block.
    ///
    /// Targets are gathered next to each other at the new position; siblings
    /// between the old and new position shift the opposite way. Names without a
    /// record are ignored. Returns `false` when nothing changed.
    pub fn reorder_block(&mut self, targets: &[String], direction: ReorderDirection) -> bool {
        let order = self.sibling_names();
        let wanted: HashSet<&str> = targets.iter().map(String::as_str).collect();
        let positions: Vec<usize> = order
            .iter()
            .enumerate()
            .filter(|(_, name)| wanted.contains(name.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        let (first, last) = match (positions.first(), positions.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return false,
        };

        let (start, end) = match direction {
            ReorderDirection::Up => (first.saturating_sub(1), last),
            ReorderDirection::Down => (first, (last + 1).min(order.len() - 1)),
        };

        let span = &order[start..=end];
        let (moving, staying): (Vec<&String>, Vec<&String>) =
            span.iter().partition(|name| wanted.contains(name.as_str()));
        let arranged: Vec<&String> = match direction {
            ReorderDirection::Up => moving.into_iter().chain(staying).collect(),
            ReorderDirection::Down => staying.into_iter().chain(moving).collect(),
        };
        self.assign_span(span, &arranged)
    }

    /// Move `mover` onto the slot of `destination` within the same store.
    ///
    /// A mover ordered before its destination ends up after it and the call returns
    /// `Some(1)`; otherwise the mover ends up before it and the call returns
    /// `Some(0)`. `offset` counts movers of the same batch that already travelled
    /// downwards onto this destination, so the next one lands after them.
    /// Returns `None` when either name has no record.
    pub fn reposition(&mut self, mover: &str, destination: &str, offset: usize) -> Option<usize> {
        let order = self.sibling_names();
        let mover_idx = order.iter().position(|name| name == mover)?;
        let dest_idx = order.iter().position(|name| name == destination)?;

        if mover_idx == dest_idx {
            return Some(0);
        }

        if mover_idx < dest_idx {
            let target_idx = (dest_idx + offset).min(order.len() - 1);
            let span = &order[mover_idx..=target_idx];
            let mut arranged: Vec<&String> = span.iter().collect();
            arranged.rotate_left(1);
            self.assign_span(span, &arranged);
            Some(1)
        } else {
            let span = &order[dest_idx..=mover_idx];
            let mut arranged: Vec<&String> = span.iter().collect();
            arranged.rotate_right(1);
            self.assign_span(span, &arranged);
            Some(0)
        }
    }

    /// Hand the span's ordering values, in ascending order, to `arranged`.
    fn assign_span(&mut self, span: &[String], arranged: &[&String]) -> bool {
        let slots: Vec<i64> = span
            .iter()
            .filter_map(|name| self.get(name).map(|entry| entry.ordering))
            .collect();
        let mut changed = false;
        for (name, slot) in arranged.iter().zip(slots) {
            if let Some(entry) = self.get_mut(name) {
                if entry.ordering != slot {
                    entry.ordering = slot;
                    changed = true;
                }
            }
        }
        changed
    }
}

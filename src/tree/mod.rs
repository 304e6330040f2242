//! Outline tree: node model, builder and the generic provider shared by every view.

pub mod builder;
pub mod expansion;
pub mod node;
pub mod path;
pub mod provider;
pub mod walker;

pub use builder::TreeBuilder;
pub use expansion::ExpansionState;
pub use node::{NodeData, NodeModel};
pub use provider::{Collapsible, ItemCommand, MoveOutcome, TreeChange, TreeItem, TreeNode, TreeProvider};

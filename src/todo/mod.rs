//! TODO view: a filtered copy of the outline showing bracketed TODOs.

pub mod cache;
pub mod node;
pub mod scan;
pub mod view;

pub use cache::{CacheEntry, TodoCache};
pub use node::{TodoContext, TodoNode};
pub use scan::{scan_fragment, scan_text, TodoSpan};
pub use view::{TodosView, TODO_VIEW};

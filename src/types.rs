//! Core identity types shared by every node in the outline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of text fragment files.
pub const FRAGMENT_EXTENSION: &str = "wt";

/// Name of the ordering store sidecar inside every orderable directory.
pub const DOT_CONFIG: &str = ".config";

/// Project-relative data directory and its fixed children.
pub const DATA_DIR: &str = "data";
pub const CHAPTERS_DIR: &str = "chapters";
pub const SNIPS_DIR: &str = "snips";
pub const RECYCLING_DIR: &str = "recycling";
pub const RECYCLING_LOG: &str = ".log";

/// Ordering given to chapters and snips that have no ordering store entry.
pub const UNORDERED: i64 = 10000;

/// Ordering of a chapter's snips container, placing it after every fragment.
pub const CHAPTER_SNIPS_ORDERING: i64 = 1_000_000;

/// Process-lifetime node identifier. Regenerated on every rebuild.
pub type InternalId = String;

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Root,
    Container,
    Chapter,
    Snip,
    Fragment,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Root => "root",
            ResourceType::Container => "container",
            ResourceType::Chapter => "chapter",
            ResourceType::Snip => "snip",
            ResourceType::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity record attached to every node.
///
/// `relative_path` joined with `file_name` (under the project root) is the node's
/// durable address. `internal` and `parent_internal_id` are only valid for the tree
/// they were built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ids {
    pub resource_type: ResourceType,
    pub display: String,
    pub internal: InternalId,
    pub relative_path: String,
    pub file_name: String,
    pub parent_type_id: ResourceType,
    pub parent_internal_id: InternalId,
    pub ordering: i64,
}

impl Ids {
    /// Absolute on-disk location of this node.
    pub fn uri(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.relative_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        if !self.file_name.is_empty() {
            path.push(&self.file_name);
        }
        path
    }

    /// Project-relative location, `/`-separated.
    pub fn relative_uri(&self) -> String {
        if self.file_name.is_empty() {
            self.relative_path.clone()
        } else {
            format!("{}/{}", self.relative_path, self.file_name)
        }
    }
}

/// Fresh internal identifier for a node being built.
pub fn fresh_internal_id() -> InternalId {
    uuid::Uuid::new_v4().to_string()
}

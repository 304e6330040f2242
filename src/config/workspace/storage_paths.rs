//! StorageConfig and resolution of per-project state paths.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_STATE_PATH: &str = ".folio/state";

fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_PATH)
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding view state such as expand/collapse maps
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the state directory for a project.
    ///
    /// The default maps into the XDG data directory so nothing is written inside
    /// the project. Any other value is taken relative to the project root.
    pub fn resolve_state_path(&self, project_root: &Path) -> Result<PathBuf, ApiError> {
        if self.state_path == Path::new(DEFAULT_STATE_PATH) {
            Ok(xdg::workspace_data_dir(project_root)?.join("state"))
        } else {
            Ok(project_root.join(&self.state_path))
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

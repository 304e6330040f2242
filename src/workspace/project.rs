//! Project layout: `.wtconfig` plus the `data/` skeleton.

use crate::error::{ApiError, StorageError};
use crate::store::{DotConfig, FsOrderingStore, OrderingStore, RecycleLog};
use crate::types::{CHAPTERS_DIR, DATA_DIR, RECYCLING_DIR, RECYCLING_LOG, SNIPS_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project metadata file at the project root.
pub const WTCONFIG: &str = ".wtconfig";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    #[serde(default = "unknown_date")]
    pub create_date: i64,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub title: String,
}

fn unknown_date() -> i64 {
    -1
}

impl WorkspaceInfo {
    pub fn new(creator: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            create_date: chrono::Utc::now().timestamp_millis(),
            creator: creator.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    info: WorkspaceInfo,
}

impl Workspace {
    /// Initialize a new project at `root`. Refuses to overwrite an existing one.
    pub fn create(root: impl Into<PathBuf>, info: WorkspaceInfo) -> Result<Self, ApiError> {
        let root = root.into();
        let wtconfig = root.join(WTCONFIG);
        if wtconfig.exists() {
            return Err(ApiError::InvalidTarget(format!(
                "{} is already a project",
                root.display()
            )));
        }

        let workspace = Self { root, info };
        for dir in workspace.required_dirs() {
            std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        let store = FsOrderingStore::new();
        store.write(&workspace.chapters_dir(), &DotConfig::new())?;
        store.write(&workspace.snips_dir(), &DotConfig::new())?;

        let log = RecycleLog::new(workspace.recycling_dir().join(RECYCLING_LOG));
        std::fs::write(log.path(), "[]").map_err(|e| StorageError::io(log.path(), e))?;

        let json = serde_json::to_string(&workspace.info).map_err(StorageError::from)?;
        std::fs::write(&wtconfig, json).map_err(|e| StorageError::io(&wtconfig, e))?;

        info!("Created project '{}' at {}", workspace.info.title, workspace.root.display());
        Ok(workspace)
    }

    /// Load the project at `root`. `None` when it is not a complete project.
    pub fn load(root: impl Into<PathBuf>) -> Result<Option<Self>, ApiError> {
        let root = root.into();
        let wtconfig = root.join(WTCONFIG);
        let content = match std::fs::read_to_string(&wtconfig) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&wtconfig, e).into()),
        };
        let info: WorkspaceInfo =
            serde_json::from_str(&content).map_err(|source| StorageError::ParseError {
                path: wtconfig.clone(),
                source,
            })?;

        let workspace = Self { root, info };
        if let Some(missing) = workspace.required_dirs().into_iter().find(|dir| !dir.is_dir()) {
            debug!("Project folder {} is missing", missing.display());
            return Ok(None);
        }
        Ok(Some(workspace))
    }

    /// Load the project at `start` or the nearest ancestor holding one.
    pub fn discover(start: &Path) -> Result<Self, ApiError> {
        for dir in start.ancestors() {
            if dir.join(WTCONFIG).is_file() {
                if let Some(workspace) = Self::load(dir)? {
                    return Ok(workspace);
                }
            }
        }
        Err(ApiError::WorkspaceNotFound(start.to_path_buf()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn info(&self) -> &WorkspaceInfo {
        &self.info
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.data_dir().join(CHAPTERS_DIR)
    }

    pub fn snips_dir(&self) -> PathBuf {
        self.data_dir().join(SNIPS_DIR)
    }

    pub fn recycling_dir(&self) -> PathBuf {
        self.data_dir().join(RECYCLING_DIR)
    }

    fn required_dirs(&self) -> [PathBuf; 3] {
        [self.chapters_dir(), self.snips_dir(), self.recycling_dir()]
    }
}

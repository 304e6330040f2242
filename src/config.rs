//! Configuration: built-in defaults, global file, project file and environment
//! merged into one `FolioConfig`.

mod facade;
pub mod merge {
    pub mod merge_policy;
    pub mod service;
}
pub mod paths {
    pub mod xdg_root;
}
pub mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod workspace_file;
}
pub mod workspace {
    pub mod storage_paths;
}

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Name of the optional per-project config file.
pub const PROJECT_CONFIG_FILE: &str = "folio.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub watch: WatchSettings,
}

/// Tuning of the file watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_batch_window_ms")]
    pub batch_window_ms: u64,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Extra patterns ignored on top of the recycling bin.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_batch_window_ms() -> u64 {
    50
}

fn default_max_batch_size() -> usize {
    100
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            batch_window_ms: default_batch_window_ms(),
            max_batch_size: default_max_batch_size(),
            ignore_patterns: Vec::new(),
        }
    }
}

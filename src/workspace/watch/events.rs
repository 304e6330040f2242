//! Watch events, batching, and configuration.

use crate::config::WatchSettings;
use crate::types::{DATA_DIR, RECYCLING_DIR};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Project root directory; `<root>/data` is watched
    pub workspace_root: PathBuf,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Batch window in milliseconds
    pub batch_window_ms: u64,
    /// Maximum events per batch
    pub max_batch_size: usize,
    /// Ignore patterns (glob patterns)
    pub ignore_patterns: Vec<String>,
}

impl WatchConfig {
    pub fn new(workspace_root: impl Into<PathBuf>, settings: &WatchSettings) -> Self {
        let mut config = Self {
            workspace_root: workspace_root.into(),
            debounce_ms: settings.debounce_ms,
            batch_window_ms: settings.batch_window_ms,
            max_batch_size: settings.max_batch_size,
            ..Self::default()
        };
        config
            .ignore_patterns
            .extend(settings.ignore_patterns.iter().cloned());
        config
    }

    pub fn data_dir(&self) -> PathBuf {
        self.workspace_root.join(DATA_DIR)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            debounce_ms: 100,
            batch_window_ms: 50,
            max_batch_size: 100,
            ignore_patterns: vec![
                format!("**/{}/{}/**", DATA_DIR, RECYCLING_DIR),
                "**/.git/**".to_string(),
                "**/.DS_Store".to_string(),
                "**/*.swp".to_string(),
                "**/*.tmp".to_string(),
                "**/*~".to_string(),
            ],
        }
    }
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// Path the event is keyed by when batching.
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) | ChangeEvent::Removed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }
}

/// Event batcher for grouping and debouncing events
pub(crate) struct EventBatcher {
    config: WatchConfig,
    pending_events: HashMap<PathBuf, ChangeEvent>,
    last_event_time: HashMap<PathBuf, Instant>,
}

impl EventBatcher {
    pub(crate) fn new(config: WatchConfig) -> Self {
        Self {
            config,
            pending_events: HashMap::new(),
            last_event_time: HashMap::new(),
        }
    }

    /// Queue an event. Returns `true` once the batch is full.
    pub(crate) fn add_event(&mut self, event: ChangeEvent) -> bool {
        if self.ignores(&event) {
            return false;
        }
        let path = event.path().to_path_buf();

        let now = Instant::now();
        let debounce_window = std::time::Duration::from_millis(self.config.debounce_ms);

        if let Some(last_time) = self.last_event_time.get(&path) {
            if now.duration_since(*last_time) < debounce_window {
                self.pending_events.insert(path, event);
                return false;
            }
        }

        self.pending_events.insert(path.clone(), event);
        self.last_event_time.insert(path, now);

        self.pending_events.len() >= self.config.max_batch_size
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending_events.is_empty()
    }

    pub(crate) fn take_batch(&mut self) -> Vec<ChangeEvent> {
        let events: Vec<_> = self.pending_events.drain().map(|(_, event)| event).collect();
        self.last_event_time.clear();
        events
    }

    /// Renames count as ignored only when both ends are, so that moving a
    /// resource into the recycling bin is still seen.
    fn ignores(&self, event: &ChangeEvent) -> bool {
        match event {
            ChangeEvent::Renamed { from, to } => self.should_ignore(from) && self.should_ignore(to),
            other => self.should_ignore(other.path()),
        }
    }

    fn should_ignore(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }
}

fn matches_pattern(path: &str, pattern: &str) -> bool {
    let path_normalized = path.replace('\\', "/");
    let pattern_normalized = pattern.replace('\\', "/");

    if pattern_normalized.contains("**") {
        let parts: Vec<&str> = pattern_normalized.split("**").collect();
        match parts.as_slice() {
            [prefix, suffix] if prefix.is_empty() => return ends_or_contains(&path_normalized, suffix),
            [prefix, suffix] if suffix.is_empty() => return path_normalized.starts_with(prefix),
            [prefix, suffix] => {
                return path_normalized.starts_with(prefix) && path_normalized.contains(suffix)
            }
            ["", middle, ""] => return path_normalized.contains(middle),
            _ => {}
        }
    }

    if let Some((head, tail)) = pattern_normalized.split_once('*') {
        return path_normalized.starts_with(head) && path_normalized.ends_with(tail);
    }

    path_normalized == pattern_normalized || path_normalized.contains(&pattern_normalized)
}

/// `**/*.swp` style suffixes match file-name endings; others match anywhere.
fn ends_or_contains(path: &str, suffix: &str) -> bool {
    match suffix.strip_prefix("/*") {
        Some(ending) => path.ends_with(ending),
        None => path.contains(suffix),
    }
}

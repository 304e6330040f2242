//! An open project: the outline and TODO views over one shared ordering store.

use super::project::Workspace;
use super::watch::ChangeEvent;
use crate::config::FolioConfig;
use crate::error::ApiError;
use crate::outline::{OutlineContext, OutlineView, OUTLINE_VIEW};
use crate::store::{FsOrderingStore, OrderingStore};
use crate::todo::{TodoContext, TodosView, TODO_VIEW};
use crate::tree::path::is_fragment_name;
use crate::tree::{ExpansionState, TreeNode, TreeProvider};
use crate::types::DOT_CONFIG;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Session {
    workspace: Workspace,
    outline: OutlineView,
    todos: TodosView,
}

impl Session {
    /// Open both views with expansion state persisted under the configured state path.
    pub fn open(workspace: Workspace, config: &FolioConfig) -> Result<Self, ApiError> {
        let state_dir = config.storage.resolve_state_path(workspace.root())?;
        let outline_state = ExpansionState::for_view(&state_dir, OUTLINE_VIEW)?;
        let todo_state = ExpansionState::for_view(&state_dir, TODO_VIEW)?;
        Self::with_state(workspace, outline_state, todo_state)
    }

    /// Open both views without persisting any presentation state.
    pub fn in_memory(workspace: Workspace) -> Result<Self, ApiError> {
        Self::with_state(workspace, ExpansionState::in_memory(), ExpansionState::in_memory())
    }

    fn with_state(
        workspace: Workspace,
        outline_state: ExpansionState,
        todo_state: ExpansionState,
    ) -> Result<Self, ApiError> {
        let store: Arc<dyn OrderingStore> = Arc::new(FsOrderingStore::new());
        let mut outline = TreeProvider::new(
            OUTLINE_VIEW,
            workspace.root(),
            OutlineContext::new(store.clone()),
            outline_state,
        );
        let mut todos = TreeProvider::new(
            TODO_VIEW,
            workspace.root(),
            TodoContext::new(store),
            todo_state,
        );
        outline.init()?;
        todos.init()?;
        Ok(Self {
            workspace,
            outline,
            todos,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn outline(&self) -> &OutlineView {
        &self.outline
    }

    pub fn outline_mut(&mut self) -> &mut OutlineView {
        &mut self.outline
    }

    pub fn todos(&self) -> &TodosView {
        &self.todos
    }

    pub fn todos_mut(&mut self) -> &mut TodosView {
        &mut self.todos
    }

    /// Rebuild both views, re-enabling any that were disabled.
    pub fn reload(&mut self) -> Result<(), ApiError> {
        let outline = reload_view(&mut self.outline);
        let todos = reload_view(&mut self.todos);
        outline.and(todos)
    }

    /// Bring the views up to date with a batch of file-system changes.
    ///
    /// Content edits of existing fragments only invalidate the TODO cache along
    /// their ancestry. Anything else rebuilds both views once.
    pub fn apply_changes(&mut self, events: &[ChangeEvent]) -> Result<(), ApiError> {
        let mut edited: BTreeSet<PathBuf> = BTreeSet::new();
        let mut structural = false;

        for event in events {
            match event {
                ChangeEvent::Modified(path)
                    if path.is_file()
                        && path
                            .file_name()
                            .and_then(|name| name.to_str())
                            .map(is_fragment_name)
                            .unwrap_or(false) =>
                {
                    edited.insert(path.clone());
                }
                ChangeEvent::Modified(path)
                    if path.file_name().map(|name| name == DOT_CONFIG).unwrap_or(false) =>
                {
                    structural = true;
                }
                ChangeEvent::Modified(path) if path.is_dir() => {
                    debug!("Ignoring metadata change on {}", path.display());
                }
                _ => structural = true,
            }
        }

        if structural {
            info!(event_count = events.len(), "Rebuilding views after structural change");
            return self.reload();
        }
        for path in &edited {
            self.todos.update(path)?;
        }
        Ok(())
    }
}

fn reload_view<N: TreeNode>(view: &mut TreeProvider<N>) -> Result<(), ApiError> {
    if view.is_registered() {
        view.refresh()
    } else {
        warn!("Re-enabling view {}", view.view_name());
        view.init()
    }
}

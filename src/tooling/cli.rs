//! CLI Tooling
//!
//! Command-line interface over an open project. Nodes are addressed by path,
//! absolute or relative to the project root.

use super::format::{
    format_outline_text, format_recycled, format_todos_json, format_todos_text, format_tree_json,
};
use crate::config::{ConfigLoader, FolioConfig};
use crate::error::ApiError;
use crate::outline::{CreateOptions, OutlineNode};
use crate::tree::{TreeNode, TreeProvider};
use crate::workspace::{Session, WatchConfig, WatchDaemon, Workspace, WorkspaceInfo};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Folio - ordered outlines for long-form writing projects
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Manage the chapters, snips and fragments of a writing project")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory (or any directory inside it)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project in the workspace directory
    Init {
        /// Project title
        #[arg(long)]
        title: String,
        /// Author recorded in the project file
        #[arg(long, default_value = "")]
        creator: String,
    },
    /// Print the outline tree
    Outline {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List bracketed TODOs
    Todos {
        /// Restrict to the fragments under this node
        path: Option<PathBuf>,
        /// Output format (text, json or tree)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a chapter, snip or fragment
    New {
        #[command(subcommand)]
        command: NewCommands,
    },
    /// Change the display title of a chapter, snip or fragment
    Rename { path: PathBuf, title: String },
    /// Move resources into the recycling bin
    Remove {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move a resource (and any selected siblings) one place up
    MoveUp {
        /// First path is the resource; all paths form the selection
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Move a resource (and any selected siblings) one place down
    MoveDown {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Drop resources onto a target, as drag-and-drop would
    Move {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Drop target; the project root when omitted
        #[arg(long)]
        to: Option<PathBuf>,
    },
    /// Keep views in sync with edits made by other programs
    Watch {
        /// Debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Batch window in milliseconds
        #[arg(long)]
        batch_window_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum NewCommands {
    /// Append a chapter
    Chapter {
        #[arg(long)]
        title: Option<String>,
        /// Do not create an initial fragment
        #[arg(long)]
        no_fragment: bool,
    },
    /// Create a snip next to or inside the given node (top-level when omitted)
    Snip {
        #[arg(long)]
        at: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        no_fragment: bool,
    },
    /// Create a fragment in the chapter or snip implied by the given node
    Fragment {
        #[arg(long)]
        at: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
    },
}

/// CLI context for one project
pub struct CliContext {
    workspace_root: PathBuf,
    config: FolioConfig,
    session: Mutex<Option<Arc<Mutex<Session>>>>,
}

impl CliContext {
    /// Create a new CLI context. The project itself is opened on first use.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            workspace_root,
            config,
            session: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// The open session, loading the project on first call.
    pub fn session(&self) -> Result<Arc<Mutex<Session>>, ApiError> {
        let mut slot = self.session.lock();
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }
        let workspace = Workspace::discover(&self.workspace_root)?;
        let session = Arc::new(Mutex::new(Session::open(workspace, &self.config)?));
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init { title, creator } => self.handle_init(title, creator),
            Commands::Outline { format } => {
                let session = self.session()?;
                let session = session.lock();
                match format.as_str() {
                    "json" => format_tree_json(session.outline()),
                    _ => format_outline_text(session.outline()),
                }
            }
            Commands::Todos { path, format } => self.handle_todos(path.as_deref(), format),
            Commands::New { command } => self.handle_new(command),
            Commands::Rename { path, title } => {
                let session = self.session()?;
                let mut session = session.lock();
                let node = resolve_node(session.outline(), path)?;
                session.outline_mut().rename_resource(&node, title)?;
                Ok(format!("Renamed {} to '{}'", node.ids().relative_uri(), title))
            }
            Commands::Remove { paths, yes } => self.handle_remove(paths, *yes),
            Commands::MoveUp { paths } => self.handle_reorder(paths, true),
            Commands::MoveDown { paths } => self.handle_reorder(paths, false),
            Commands::Move { paths, to } => {
                let session = self.session()?;
                let mut session = session.lock();
                let movers = resolve_nodes(session.outline(), paths)?;
                let target = to
                    .as_deref()
                    .map(|to| resolve_node(session.outline(), to))
                    .transpose()?;
                let moved = session.outline_mut().handle_drop(target, &movers)?;
                Ok(format!("Moved {} of {} resources", moved, movers.len()))
            }
            Commands::Watch {
                debounce_ms,
                batch_window_ms,
            } => {
                let session = self.session()?;
                let root = session.lock().workspace().root().to_path_buf();
                let mut config = WatchConfig::new(root, &self.config.watch);
                if let Some(ms) = debounce_ms {
                    config.debounce_ms = *ms;
                }
                if let Some(ms) = batch_window_ms {
                    config.batch_window_ms = *ms;
                }
                let daemon = WatchDaemon::new(session, config);
                daemon.start()?;
                Ok("Watch stopped".to_string())
            }
        }
    }

    fn handle_init(&self, title: &str, creator: &str) -> Result<String, ApiError> {
        let workspace = Workspace::create(&self.workspace_root, WorkspaceInfo::new(creator, title))?;
        info!("Initialized project at {}", workspace.root().display());
        Ok(format!(
            "Initialized project '{}' at {}",
            workspace.info().title,
            workspace.root().display()
        ))
    }

    fn handle_todos(&self, path: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let session = self.session()?;
        let session = session.lock();
        let view = session.todos();
        if format == "tree" {
            return format_tree_json(view);
        }
        let uri = match path {
            Some(path) => resolve_path(view.root(), path),
            None => view.tree()?.uri(view.root()),
        };
        let todos = view.todos_under(&uri)?;
        match format {
            "json" => format_todos_json(&todos),
            _ => Ok(format_todos_text(view.root(), &todos)),
        }
    }

    fn handle_new(&self, command: &NewCommands) -> Result<String, ApiError> {
        let session = self.session()?;
        let mut session = session.lock();
        let created = match command {
            NewCommands::Chapter { title, no_fragment } => {
                session.outline_mut().new_chapter(CreateOptions {
                    default_name: title.clone(),
                    skip_fragment: *no_fragment,
                    ..CreateOptions::default()
                })?
            }
            NewCommands::Snip {
                at,
                title,
                no_fragment,
            } => {
                let at = at
                    .as_deref()
                    .map(|at| resolve_node(session.outline(), at))
                    .transpose()?;
                session.outline_mut().new_snip(
                    at.as_deref(),
                    CreateOptions {
                        default_name: title.clone(),
                        skip_fragment: *no_fragment,
                        ..CreateOptions::default()
                    },
                )?
            }
            NewCommands::Fragment { at, title } => {
                let at = at
                    .as_deref()
                    .map(|at| resolve_node(session.outline(), at))
                    .transpose()?;
                session.outline_mut().new_fragment(
                    at.as_deref(),
                    CreateOptions {
                        default_name: title.clone(),
                        ..CreateOptions::default()
                    },
                )?
            }
        };
        Ok(created.display().to_string())
    }

    fn handle_remove(&self, paths: &[PathBuf], yes: bool) -> Result<String, ApiError> {
        let session = self.session()?;
        let mut session = session.lock();
        let targets = resolve_nodes(session.outline(), paths)?;
        let records = session.outline_mut().remove_resources(&targets, |roots| {
            if yes {
                return true;
            }
            use dialoguer::Confirm;
            let titles: Vec<&str> = roots.iter().map(|n| n.ids().display.as_str()).collect();
            Confirm::new()
                .with_prompt(format!(
                    "Move {} resources to the recycling bin? ({})",
                    roots.len(),
                    titles.join(", ")
                ))
                .interact()
                .unwrap_or(false)
        })?;
        Ok(format_recycled(&records))
    }

    fn handle_reorder(&self, paths: &[PathBuf], up: bool) -> Result<String, ApiError> {
        let session = self.session()?;
        let mut session = session.lock();
        let selection = resolve_nodes(session.outline(), paths)?;
        let Some(resource) = selection.first().cloned() else {
            return Ok("Nothing selected".to_string());
        };
        let moved = if up {
            session.outline_mut().move_up(&resource, &selection)?
        } else {
            session.outline_mut().move_down(&resource, &selection)?
        };
        Ok(if moved {
            format!("Moved {} {}", resource.ids().display, if up { "up" } else { "down" })
        } else {
            format!("{} did not move", resource.ids().display)
        })
    }
}

fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn resolve_node<N: TreeNode>(view: &TreeProvider<N>, path: &Path) -> Result<Arc<N>, ApiError> {
    let uri = resolve_path(view.root(), path);
    view.lookup_by_uri(&uri)
        .ok_or_else(|| ApiError::NodeNotFound(uri.display().to_string()))
}

fn resolve_nodes(
    view: &TreeProvider<OutlineNode>,
    paths: &[PathBuf],
) -> Result<Vec<Arc<OutlineNode>>, ApiError> {
    paths.iter().map(|path| resolve_node(view, path)).collect()
}

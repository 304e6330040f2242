//! Project workspace: on-disk layout, the open views and the watch runtime.

mod project;
mod session;
pub mod watch;

pub use project::{Workspace, WorkspaceInfo, WTCONFIG};
pub use session::Session;
pub use watch::{ChangeEvent, WatchConfig, WatchDaemon};

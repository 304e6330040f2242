//! Watch runtime: events and daemon.

mod events;
mod runtime;

pub use events::{ChangeEvent, WatchConfig};
pub use runtime::WatchDaemon;

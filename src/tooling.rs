//! Tooling & Integration Layer
//!
//! Command-line surface over a project session, and the text/JSON renderers it uses.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, NewCommands};

//! Folio: Ordered Outline Trees for Writing Projects
//!
//! A project is a plain directory of chapters, snips and fragments. Each folder
//! carries a `.config` ordering store; the outline and TODO views are rebuilt
//! from disk and every structural edit goes through the stores first.

pub mod access;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod outline;
pub mod store;
pub mod todo;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod workspace;

//! Error types for ordering stores, tree construction and outline operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing on-disk state (ordering stores, recycling log, fragments).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing directory has no `.config`; the project was edited behind our back.
    #[error("ordering store missing at {0}")]
    MissingStore(PathBuf),

    #[error("failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures while rebuilding the node tree from disk.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("error initializing workspace from file system: '{0}' wasn't found")]
    MissingDirectory(PathBuf),

    #[error("could not read folder at '{path}': {source}")]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Top-level error returned by outline, TODO and workspace operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    StructureError(#[from] TreeError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The view failed to rebuild and has been unregistered.
    #[error("view '{0}' is disabled until the project is repaired")]
    ProviderDisabled(String),

    /// The in-memory tree and the ordering stores disagree in a way the layout forbids.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("no workspace found at {0}")]
    WorkspaceNotFound(PathBuf),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StorageError(StorageError::IoError(err))
    }
}

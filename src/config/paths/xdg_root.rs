//! XDG Base Directory utilities for per-project data.

use crate::error::ApiError;
use std::path::{Component, Path, PathBuf};

/// Get XDG data home directory
///
/// Returns `$XDG_DATA_HOME` if set, otherwise defaults to `$HOME/.local/share`
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg_data_home));
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local").join("share"))
}

/// Get the data directory for a specific project
///
/// Returns `$XDG_DATA_HOME/folio/<canonical project path>/`. For example
/// `/home/user/novel` becomes `$XDG_DATA_HOME/folio/home/user/novel/`.
pub fn workspace_data_dir(project_root: &Path) -> Result<PathBuf, ApiError> {
    let data_home = data_home().ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })?;
    scoped_by_project(&data_home.join("folio"), project_root)
}

/// `base` extended with the normal components of the canonical project path.
pub fn scoped_by_project(base: &Path, project_root: &Path) -> Result<PathBuf, ApiError> {
    let canonical = project_root.canonicalize().map_err(|e| {
        ApiError::ConfigError(format!("Failed to canonicalize project path: {}", e))
    })?;
    let canonical = dunce::simplified(&canonical).to_path_buf();

    let mut dir = base.to_path_buf();
    for component in canonical.components() {
        if let Component::Normal(name) = component {
            dir.push(name);
        }
    }
    Ok(dir)
}

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config_home));
    }

    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

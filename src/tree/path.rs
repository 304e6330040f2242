//! Path comparison helpers.

use std::path::{Path, PathBuf};

/// Normalized form used wherever paths are compared or used as keys.
pub fn normalize(path: &Path) -> PathBuf {
    dunce::simplified(path).to_path_buf()
}

pub fn same_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// True when `name` is a text fragment file name.
pub fn is_fragment_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext == crate::types::FRAGMENT_EXTENSION)
        .unwrap_or(false)
}

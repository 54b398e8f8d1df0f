//! Helper utilities for loader path handling.

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Directory used for file discovery and relative paths.
pub(super) fn search_root(root: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match root {
        Some(root) => normalize_path(root),
        None => std::env::current_dir().map_err(|source| ConfigError::FileRead {
            path: PathBuf::from("."),
            source,
        }),
    }
}

/// Normalize a path by canonicalizing when possible, preserving NotFound.
fn normalize_path(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(source) => Err(ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

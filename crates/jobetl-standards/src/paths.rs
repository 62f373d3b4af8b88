//! Reference directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the reference directory.
pub const REFERENCE_ENV_VAR: &str = "JOBETL_REFERENCE_DIR";

/// Get the reference root directory.
///
/// Resolution order:
/// 1. `JOBETL_REFERENCE_DIR` environment variable
/// 2. `reference/` directory relative to workspace root
pub fn reference_root() -> PathBuf {
    if let Ok(root) = std::env::var(REFERENCE_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}

/// An explicit directory (from the command line) wins over [`reference_root`].
pub fn resolve_reference_root(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(reference_root, Path::to_path_buf)
}

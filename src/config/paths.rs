use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

use crate::{Result, SyncError};

/// Get the path to the default repository list
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitthemall").map(|dirs| dirs.config_dir().join("repos.conf"))
}

/// Expand a leading `~` to the current user's home directory.
///
/// Only the bare `~` and `~/...` forms are expanded; `~user` is left as-is.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if !needs_expansion(path) {
        return Ok(PathBuf::from(path));
    }

    let dirs = BaseDirs::new().ok_or(SyncError::NoHomeDir)?;
    Ok(expand_home_with(path, dirs.home_dir()))
}

fn needs_expansion(path: &str) -> bool {
    path == "~" || path.starts_with("~/")
}

fn expand_home_with(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) if needs_expansion(path) => {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            }
        }
        _ => PathBuf::from(path),
    }
}

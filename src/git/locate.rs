use std::path::{Path, PathBuf};

use crate::config::expand_home;
use crate::{Result, SyncError};

/// Resolve a configured repository path to its working directory.
///
/// The path must be an existing directory holding a non-bare git repository
/// at its top level; parent directories are not searched.
pub fn locate(raw: &str) -> Result<PathBuf> {
    let path = expand_home(raw)?;
    tracing::debug!("going to {}", path.display());
    locate_path(&path)
}

fn locate_path(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(SyncError::RepoNotFound(path.to_path_buf()));
    }

    let repo =
        git2::Repository::open(path).map_err(|_| SyncError::NotGitRepo(path.to_path_buf()))?;

    match repo.workdir() {
        Some(workdir) if !repo.is_bare() => Ok(workdir.to_path_buf()),
        _ => Err(SyncError::NotGitRepo(path.to_path_buf())),
    }
}

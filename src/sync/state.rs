use std::path::Path;

use crate::git::Vcs;
use crate::Result;

/// Whether the working tree has uncommitted changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    Dirty,
}

impl std::fmt::Display for TreeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeState::Clean => write!(f, "clean"),
            TreeState::Dirty => write!(f, "dirty"),
        }
    }
}

/// Relationship between local HEAD and its upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadState {
    /// Same tip
    UpToDate,
    /// Upstream has commits HEAD lacks
    Older,
    /// HEAD has commits upstream lacks
    Newer,
    /// Both sides have commits the other lacks
    Forked,
}

impl HeadState {
    pub fn classify(remote_is_ancestor_of_local: bool, local_is_ancestor_of_remote: bool) -> Self {
        match (remote_is_ancestor_of_local, local_is_ancestor_of_remote) {
            (true, true) => HeadState::UpToDate,
            (true, false) => HeadState::Newer,
            (false, true) => HeadState::Older,
            (false, false) => HeadState::Forked,
        }
    }

    /// Upstream has commits that need pulling
    pub fn is_behind(&self) -> bool {
        matches!(self, HeadState::Older | HeadState::Forked)
    }
}

impl std::fmt::Display for HeadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadState::UpToDate => write!(f, "up_to_date"),
            HeadState::Older => write!(f, "older"),
            HeadState::Newer => write!(f, "newer"),
            HeadState::Forked => write!(f, "forked"),
        }
    }
}

/// Tree state together with the status lines that made it dirty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStatus {
    pub state: TreeState,
    pub lines: Vec<String>,
}

pub fn tree_status(vcs: &dyn Vcs, repo: &Path) -> Result<TreeStatus> {
    let lines = vcs.status(repo)?;
    let state = if lines.is_empty() {
        TreeState::Clean
    } else {
        TreeState::Dirty
    };

    Ok(TreeStatus { state, lines })
}

/// Classify HEAD against its upstream.
///
/// Both sides are resolved to commit ids first so that a missing upstream or
/// an unknown revision surfaces as an error instead of "not an ancestor".
pub fn head_state(vcs: &dyn Vcs, repo: &Path) -> Result<HeadState> {
    let upstream = vcs.upstream(repo)?;
    let local = vcs.resolve(repo, "HEAD")?;
    let remote = vcs.resolve(repo, &upstream)?;

    let local_is_ancestor_of_remote = vcs.is_ancestor(repo, &local, &remote)?;
    let remote_is_ancestor_of_local = vcs.is_ancestor(repo, &remote, &local)?;

    let state = HeadState::classify(remote_is_ancestor_of_local, local_is_ancestor_of_remote);
    tracing::debug!(%upstream, %local, %remote, %state, "head state");
    Ok(state)
}

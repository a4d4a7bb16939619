use std::path::Path;

use crate::config::{Action, RepoTask};
use crate::git::{locate, Vcs};
use crate::sync::state::{head_state, tree_status, HeadState, TreeState};
use crate::ui::create_spinner;
use crate::{Result, SyncError};

/// Message used for commits created on behalf of the user
pub const COMMIT_MESSAGE: &str = "Automated commit by gitthemall";

/// Why a repository was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DirtyTree,
    HeadBehind,
    HeadAhead,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DirtyTree => write!(f, "dirty tree"),
            SkipReason::HeadBehind => write!(f, "HEAD behind"),
            SkipReason::HeadAhead => write!(f, "HEAD ahead"),
        }
    }
}

/// Result of a completed repository update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Synced,
    Skipped(SkipReason),
}

/// Per-run tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} synced, {} skipped, {} failed",
            self.synced, self.skipped, self.failed
        )
    }
}

/// Brings a single repository in line with its upstream
pub struct Updater<'a> {
    vcs: &'a dyn Vcs,
    progress: bool,
}

impl<'a> Updater<'a> {
    pub fn new(vcs: &'a dyn Vcs) -> Self {
        Self {
            vcs,
            progress: false,
        }
    }

    /// Show a spinner while network commands run
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn network(&self, message: String, op: impl FnOnce() -> Result<()>) -> Result<()> {
        let spinner = create_spinner(message, self.progress);
        let result = op();
        spinner.finish_and_clear();
        result
    }

    /// Fetch, then commit, pull and push as far as `task` permits.
    ///
    /// Fetch always runs; the `fetch` token is accepted but not required.
    pub fn update(&self, repo: &Path, task: &RepoTask) -> Result<Outcome> {
        let name = &task.path;

        self.network(format!("Fetching {}", name), || self.vcs.fetch(repo))?;

        let tree = tree_status(self.vcs, repo)?;
        if tree.state == TreeState::Dirty {
            if !task.permits(Action::Commit) {
                tracing::info!("Skip repo with dirty tree: {}", name);
                for line in &tree.lines {
                    tracing::info!("{}", line);
                }
                return Ok(Outcome::Skipped(SkipReason::DirtyTree));
            }

            tracing::info!("Committing {} changed paths in {}", tree.lines.len(), name);
            self.vcs.commit_all(repo, COMMIT_MESSAGE)?;

            let after = tree_status(self.vcs, repo)?;
            if after.state != TreeState::Clean {
                return Err(SyncError::Invariant(format!(
                    "tree still dirty after commit: {}",
                    after.lines.join("; ")
                )));
            }
        }

        let mut head = head_state(self.vcs, repo)?;
        if head.is_behind() {
            if !task.permits(Action::Pull) {
                tracing::info!("HEAD behind, skipping {}", name);
                return Ok(Outcome::Skipped(SkipReason::HeadBehind));
            }

            tracing::info!("Pulling {} (HEAD {})", name, head);
            self.network(format!("Pulling {}", name), || self.vcs.pull_rebase(repo))?;
            head = head_state(self.vcs, repo)?;
        }

        if head == HeadState::Newer {
            if !task.permits(Action::Push) {
                tracing::info!("HEAD ahead, skipping {}", name);
                return Ok(Outcome::Skipped(SkipReason::HeadAhead));
            }

            tracing::info!("Pushing {}", name);
            self.network(format!("Pushing {}", name), || self.vcs.push(repo))?;
        }

        let head = head_state(self.vcs, repo)?;
        if head != HeadState::UpToDate {
            return Err(SyncError::Invariant(format!(
                "HEAD is {} after sync, expected up_to_date",
                head
            )));
        }

        Ok(Outcome::Synced)
    }
}

/// Update every task in order.
///
/// A repository that cannot be located aborts the run; any other failure is
/// logged and counted, and the next repository is processed.
pub fn run(vcs: &dyn Vcs, tasks: &[RepoTask], progress: bool) -> Result<Summary> {
    let updater = Updater::new(vcs).with_progress(progress);
    let mut summary = Summary::default();

    for task in tasks {
        tracing::debug!("updating {} (line {})", task.path, task.line);
        let repo = locate(&task.path)?;

        match updater.update(&repo, task) {
            Ok(Outcome::Synced) => {
                tracing::debug!("{} is up to date", task.path);
                summary.synced += 1;
            }
            Ok(Outcome::Skipped(reason)) => {
                tracing::debug!("{} skipped: {}", task.path, reason);
                summary.skipped += 1;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!("{}: {}", task.path, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

use crate::{Result, SyncError};
use std::path::Path;
use std::process::{Command, Output};

/// Trait for the version control operations the sync driver needs.
///
/// Every method takes the repository working directory explicitly so that
/// nothing depends on the process-wide current directory.
pub trait Vcs {
    /// Update remote-tracking refs without touching the working tree
    fn fetch(&self, repo: &Path) -> Result<()>;

    /// Non-blank porcelain status lines (tracked and untracked changes)
    fn status(&self, repo: &Path) -> Result<Vec<String>>;

    /// Full ref name of the current branch's upstream, e.g. `refs/remotes/origin/main`
    fn upstream(&self, repo: &Path) -> Result<String>;

    /// Resolve a revision to a full commit id
    fn resolve(&self, repo: &Path, rev: &str) -> Result<String>;

    /// True iff `ancestor` is reachable from `descendant`
    fn is_ancestor(&self, repo: &Path, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Stage everything (including untracked and deleted files) and commit
    fn commit_all(&self, repo: &Path, message: &str) -> Result<()>;

    /// Replay local commits on top of the upstream
    fn pull_rebase(&self, repo: &Path) -> Result<()>;

    /// Publish HEAD to the configured upstream
    fn push(&self, repo: &Path) -> Result<()>;
}

// =============================================================================
// Git Implementation
// =============================================================================

/// Git VCS implementation backed by the `git` binary
#[derive(Debug, Clone, Copy, Default)]
pub struct Git;

impl Git {
    fn command(repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(repo).args(args);
        cmd
    }

    /// Network commands must fail rather than wait on a prompt nobody sees
    fn network_command(repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Self::command(repo, args);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    fn describe(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }

    /// Run to completion, returning the output whatever the exit status
    fn output(mut cmd: Command, description: &str) -> Result<Output> {
        tracing::debug!(command = %description, "running");

        let output = cmd.output().map_err(|source| SyncError::GitSpawn {
            command: description.to_string(),
            source,
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!("{line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            tracing::debug!("{line}");
        }

        Ok(output)
    }

    /// Run and require a zero exit status
    fn run(cmd: Command, description: &str) -> Result<Output> {
        let output = Self::output(cmd, description)?;

        if !output.status.success() {
            return Err(Self::failure(description, &output));
        }

        Ok(output)
    }

    fn run_args(repo: &Path, args: &[&str]) -> Result<String> {
        let output = Self::run(Self::command(repo, args), &Self::describe(args))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn failure(description: &str, output: &Output) -> SyncError {
        SyncError::GitCommand {
            command: description.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    fn current_branch(repo: &Path) -> Result<String> {
        let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
        let output = Self::output(Self::command(repo, &args), &Self::describe(&args))?;

        if !output.status.success() {
            return Err(SyncError::NoUpstream {
                detail: "HEAD is detached".to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn branch_config(repo: &Path, branch: &str, key: &str) -> Result<String> {
        let name = format!("branch.{}.{}", branch, key);
        let args = ["config", "--get", name.as_str()];
        let output = Self::output(Self::command(repo, &args), &Self::describe(&args))?;

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || value.is_empty() {
            return Err(SyncError::NoUpstream {
                detail: format!("{} is not set", name),
            });
        }

        Ok(value)
    }
}

impl Vcs for Git {
    fn fetch(&self, repo: &Path) -> Result<()> {
        let args = ["fetch"];
        Self::run(Self::network_command(repo, &args), &Self::describe(&args))?;
        Ok(())
    }

    fn status(&self, repo: &Path) -> Result<Vec<String>> {
        // Untracked files count as dirty whatever status.showUntrackedFiles says
        let args = ["status", "--porcelain", "--untracked-files=all"];
        let output = Self::run(Self::command(repo, &args), &Self::describe(&args))?;

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end().to_string())
            .collect();

        Ok(lines)
    }

    fn upstream(&self, repo: &Path) -> Result<String> {
        Self::current_branch(repo)?;

        let args = ["rev-parse", "--symbolic-full-name", "@{upstream}"];
        let output = Self::output(Self::command(repo, &args), &Self::describe(&args))?;

        if !output.status.success() {
            return Err(SyncError::NoUpstream {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn resolve(&self, repo: &Path, rev: &str) -> Result<String> {
        let spec = format!("{}^{{commit}}", rev);
        Self::run_args(repo, &["rev-parse", "--verify", spec.as_str()])
    }

    fn is_ancestor(&self, repo: &Path, ancestor: &str, descendant: &str) -> Result<bool> {
        let args = ["merge-base", "--is-ancestor", ancestor, descendant];
        let description = Self::describe(&args);
        let output = Self::output(Self::command(repo, &args), &description)?;

        // Exit status 1 is reserved for "not an ancestor"; errors use others
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Self::failure(&description, &output)),
        }
    }

    fn commit_all(&self, repo: &Path, message: &str) -> Result<()> {
        Self::run_args(repo, &["add", "--all"])?;
        Self::run_args(repo, &["commit", "--quiet", "-m", message])?;
        Ok(())
    }

    fn pull_rebase(&self, repo: &Path) -> Result<()> {
        let args = ["pull", "--rebase"];
        Self::run(Self::network_command(repo, &args), &Self::describe(&args))?;
        Ok(())
    }

    fn push(&self, repo: &Path) -> Result<()> {
        let branch = Self::current_branch(repo)?;
        let remote = Self::branch_config(repo, &branch, "remote")?;
        let merge = Self::branch_config(repo, &branch, "merge")?;

        // Use explicit refspec format so the result does not depend on
        // the user's push.default setting
        let refspec = format!("HEAD:{}", merge);
        let args = ["push", remote.as_str(), refspec.as_str()];
        Self::run(Self::network_command(repo, &args), &Self::describe(&args))?;
        Ok(())
    }
}

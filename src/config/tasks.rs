use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use crate::{Result, SyncError};

/// A synchronization step a repository may be allowed to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Fetch,
    Commit,
    Pull,
    Push,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Fetch => "fetch",
            Action::Commit => "commit",
            Action::Pull => "pull",
            Action::Push => "push",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fetch" => Ok(Action::Fetch),
            "commit" => Ok(Action::Commit),
            "pull" => Ok(Action::Pull),
            "push" => Ok(Action::Push),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the repository list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTask {
    /// Path as written in the config, before home expansion
    pub path: String,
    pub actions: BTreeSet<Action>,
    /// 1-based line number in the config file
    pub line: usize,
}

impl RepoTask {
    pub fn permits(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Read and parse the repository list at `path`
pub fn load_tasks(path: &Path) -> Result<Vec<RepoTask>> {
    let content = std::fs::read_to_string(path).map_err(|source| SyncError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_tasks(&content)
}

/// Parse `<path>,<action>,...` lines.
///
/// Blank lines and `#` comments are skipped, empty action fields are ignored.
/// The whole list is rejected on the first bad line so that no repository is
/// touched with a half-read config.
pub fn parse_tasks(content: &str) -> Result<Vec<RepoTask>> {
    let mut tasks = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split(',').map(str::trim);
        let path = fields.next().unwrap_or_default();
        if path.is_empty() {
            return Err(SyncError::MissingPath { line });
        }

        let actions = fields
            .filter(|field| !field.is_empty())
            .map(|field| {
                field
                    .parse::<Action>()
                    .map_err(|token| SyncError::UnknownAction { line, token })
            })
            .collect::<Result<BTreeSet<_>>>()?;

        tasks.push(RepoTask {
            path: path.to_string(),
            actions,
            line,
        });
    }

    Ok(tasks)
}

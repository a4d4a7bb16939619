use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    // Config Errors
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown action: {token} (line {line})")]
    UnknownAction { line: usize, token: String },

    #[error("Missing repository path (line {line})")]
    MissingPath { line: usize },

    // Location Errors
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("No directory at {}!", .0.display())]
    RepoNotFound(PathBuf),

    #[error("No git repo at {}!", .0.display())]
    NotGitRepo(PathBuf),

    // Git Errors
    #[error("No upstream for current branch: {detail}")]
    NoUpstream { detail: String },

    #[error("`{command}` failed with exit code {code:?}: {stderr}")]
    GitCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to run `{command}`: {source}")]
    GitSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Logic Errors
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl SyncError {
    /// Config and location errors abort the whole run; everything else only
    /// fails the repository being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::ConfigRead { .. }
                | SyncError::UnknownAction { .. }
                | SyncError::MissingPath { .. }
                | SyncError::NoHomeDir
                | SyncError::RepoNotFound(_)
                | SyncError::NotGitRepo(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

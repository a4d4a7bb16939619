#![allow(dead_code)]

use assert_cmd::prelude::CommandCargoExt;
use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::{Path, PathBuf};

pub const AUTOMATED_MESSAGE: &str = "Automated commit by gitthemall";

/// Temp directory with a bare "remote" and isolated git configuration
pub struct Sandbox {
    pub dir: TempDir,
}

#[fixture]
pub fn sandbox() -> Sandbox {
    let sandbox = Sandbox {
        dir: TempDir::new().expect("Failed to create temp dir"),
    };
    sandbox
        .dir
        .child("home")
        .create_dir_all()
        .expect("Failed to create home dir");
    sandbox
}

impl Sandbox {
    fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    fn isolate(&self, cmd: &mut std::process::Command) {
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("RUST_LOG")
            .env("GIT_AUTHOR_NAME", "Sync Tester")
            .env("GIT_AUTHOR_EMAIL", "sync@example.com")
            .env("GIT_COMMITTER_NAME", "Sync Tester")
            .env("GIT_COMMITTER_EMAIL", "sync@example.com");
    }

    /// Run git in `dir`, panicking on failure, returning trimmed stdout
    pub fn git(&self, dir: &Path, args: &[&str]) -> String {
        let mut cmd = std::process::Command::new("git");
        cmd.current_dir(dir).args(args);
        self.isolate(&mut cmd);

        let output = cmd.output().expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn remote(&self) -> PathBuf {
        self.dir.path().join("remote.git")
    }

    /// Bare remote seeded with one commit on its default branch
    pub fn init_remote(&self) {
        self.git(self.dir.path(), &["init", "--bare", "--quiet", "remote.git"]);
        let seed = self.clone_repo("seed");
        self.commit_file(&seed, "README.md", "seed\n", "Initial commit");
        self.git(&seed, &["push", "--quiet", "-u", "origin", "HEAD"]);
    }

    pub fn clone_repo(&self, name: &str) -> PathBuf {
        let remote = self.remote().display().to_string();
        self.git(self.dir.path(), &["clone", "--quiet", &remote, name]);
        self.dir.path().join(name)
    }

    pub fn write_file(&self, repo: &Path, file: &str, content: &str) {
        std::fs::write(repo.join(file), content).expect("Failed to write file");
    }

    pub fn commit_file(&self, repo: &Path, file: &str, content: &str, message: &str) {
        self.write_file(repo, file, content);
        self.git(repo, &["add", file]);
        self.git(repo, &["commit", "--quiet", "-m", message]);
    }

    /// Commit in a throwaway clone and push it, leaving other clones behind
    pub fn advance_remote(&self, helper: &str, file: &str) {
        let clone = self.clone_repo(helper);
        self.commit_file(&clone, file, "from elsewhere\n", "Remote change");
        self.git(&clone, &["push", "--quiet"]);
    }

    pub fn head(&self, repo: &Path) -> String {
        self.git(repo, &["rev-parse", "HEAD"])
    }

    pub fn remote_head(&self) -> String {
        self.git(&self.remote(), &["rev-parse", "HEAD"])
    }

    pub fn remote_log(&self) -> String {
        self.git(&self.remote(), &["log", "--format=%s"])
    }

    pub fn status(&self, repo: &Path) -> String {
        self.git(repo, &["status", "--porcelain"])
    }

    pub fn write_config(&self, lines: &[String]) -> PathBuf {
        let config = self.dir.child("repos.conf");
        config
            .write_str(&(lines.join("\n") + "\n"))
            .expect("Failed to write config");
        config.path().to_path_buf()
    }

    /// The binary under test, run with the sandbox's git environment
    pub fn gitthemall(&self, config: &Path) -> Command {
        let mut cmd = std::process::Command::cargo_bin("gitthemall")
            .expect("Failed to find gitthemall binary");
        cmd.current_dir(self.dir.path()).arg(config);
        self.isolate(&mut cmd);
        Command::from_std(cmd)
    }
}

pub fn line(repo: &Path, actions: &str) -> String {
    if actions.is_empty() {
        repo.display().to_string()
    } else {
        format!("{},{}", repo.display(), actions)
    }
}

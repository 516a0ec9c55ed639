//! System git backend
//!
//! Shells out to the `git` binary for the two things release-prep needs:
//! staging a file and committing it.

use crate::core::error::{GitError, PrepError, PrepResult, ResultExt};
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Identity variables passed through to commits made by release jobs
const IDENTITY_VARS: [&str; 4] = [
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

/// Git backend using system git
pub struct SystemGit {
  /// Directory git is run from (`git -C`)
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git working tree containing `path`
  pub fn open(path: &Path) -> PrepResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || stderr.contains("cannot change to") {
        return Err(PrepError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(PrepError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();
    tracing::debug!(path = %path.display(), work_tree, "opened git repository");

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> PrepResult<String> {
    let output = self.run(&["rev-parse", "HEAD"], "git rev-parse HEAD")?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Stage `file` and commit only that path with `message`, returning the new HEAD
  pub fn commit_file(&self, file: &Path, message: &str) -> PrepResult<String> {
    let pathspec = path_to_git_format(self.pathspec(file));

    self.run(&["add", "--", &pathspec], &format!("git add {}", pathspec))?;
    self.run(
      &["commit", "-m", message, "--", &pathspec],
      &format!("git commit -- {}", pathspec),
    )?;

    let sha = self.head_commit()?;
    tracing::debug!(file = %pathspec, work_tree = %self.work_tree.display(), sha = %sha, "committed file");
    Ok(sha)
  }

  /// `file` relative to the directory git runs from
  fn pathspec<'a>(&self, file: &'a Path) -> &'a Path {
    file.strip_prefix(&self.repo_path).unwrap_or(file)
  }

  fn run(&self, args: &[&str], command: &str) -> PrepResult<Output> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run {}", command))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);
      // `git commit` reports "nothing to commit" on stdout
      let detail = if stderr.trim().is_empty() { stdout } else { stderr };
      return Err(PrepError::Git(GitError::CommandFailed {
        command: command.to_string(),
        stderr: detail.trim().to_string(),
      }));
    }

    Ok(output)
  }

  /// Create a git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists PATH, HOME and the commit identity variables
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }
    for var in IDENTITY_VARS {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }

    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

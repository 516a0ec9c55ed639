pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::PrepResult;
use std::path::Path;

/// Stages and commits a single file
///
/// Implemented by [`GitCommitGateway`]; commands take the trait so a test
/// can swap in something that records instead of committing.
pub trait CommitGateway {
  /// Returns the SHA of the created commit
  fn commit_file(&self, file: &Path, message: &str) -> PrepResult<String>;
}

/// Gateway that opens the repository containing each file with system git
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCommitGateway;

impl CommitGateway for GitCommitGateway {
  fn commit_file(&self, file: &Path, message: &str) -> PrepResult<String> {
    let working_dir = match file.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let git = SystemGit::open(working_dir)?;
    git.commit_file(file, message)
  }
}

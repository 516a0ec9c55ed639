//! In-place mutation of release documents
//!
//! - **readme**: rewrite the `Version:` line
//! - **changelog**: splice a new block below the header lines
//!
//! Both write through a temporary file in the target's directory that is
//! renamed over the original, so a failed write leaves the old file intact.

pub mod changelog;
pub mod readme;

pub use changelog::insert_changelog_block;
pub use readme::{ReadmeUpdate, plan_readme_update, update_readme};

use crate::core::error::{DocumentError, PrepResult, ResultExt};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Fail unless `path` is an existing regular file
pub fn require_file(path: &Path) -> Result<(), DocumentError> {
  if path.is_file() {
    Ok(())
  } else {
    Err(DocumentError::FileNotFound {
      path: path.to_path_buf(),
    })
  }
}

/// Replace `path` with `content`, keeping its permissions
pub(crate) fn write_atomic(path: &Path, content: &str) -> PrepResult<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let permissions = fs::metadata(path)
    .with_context(|| format!("Failed to stat {}", path.display()))?
    .permissions();

  let mut tmp = tempfile::NamedTempFile::new_in(dir)
    .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
  tmp
    .write_all(content.as_bytes())
    .with_context(|| format!("Failed to write {}", path.display()))?;
  tmp.as_file().sync_all()?;
  fs::set_permissions(tmp.path(), permissions)?;
  tmp
    .persist(path)
    .with_context(|| format!("Failed to replace {}", path.display()))?;

  tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
  Ok(())
}

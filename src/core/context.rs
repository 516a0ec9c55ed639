//! Invocation context - build once, pass everywhere
//!
//! Holds what every step of a run shares: the working directory, the merged
//! configuration and the as-of date. The date is captured once in `main` (or
//! taken from `--as-of`) so the readme and the changelog agree on it.

use crate::core::config::{ConfigOverrides, PrepConfig};
use crate::core::error::PrepResult;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PrepContext {
  /// Directory release-prep was started from
  pub root: PathBuf,

  /// Config file merged with command line overrides
  pub config: PrepConfig,

  /// Date written into the readme and the changelog header
  pub as_of: NaiveDate,
}

impl PrepContext {
  /// Load configuration from `root` (or `explicit_config`) and apply overrides
  pub fn build(
    root: &Path,
    explicit_config: Option<&Path>,
    overrides: ConfigOverrides,
    as_of: NaiveDate,
  ) -> PrepResult<Self> {
    let config = PrepConfig::load(root, explicit_config)?.with_overrides(overrides)?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
      as_of,
    })
  }

  /// Resolve a user-supplied path against the starting directory
  pub fn resolve_path(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }
}

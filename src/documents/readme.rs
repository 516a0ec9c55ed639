use super::{require_file, write_atomic};
use crate::core::error::{PrepResult, ResultExt};
use chrono::NaiveDate;
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;

/// Lines holding the released version, e.g. `Version: 4.1.2.Final - 27 Feb 2015`
const VERSION_LINE: &str = r"(?m)^Version:[^\r\n]*";

/// New readme content and how many `Version:` lines it touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeUpdate {
  pub content: String,
  pub replaced: usize,
  pub changed: bool,
}

/// `Version: <version> - <DD Mon YYYY>`
pub fn version_line(version: &str, date: NaiveDate) -> String {
  format!("Version: {} - {}", version, date.format("%d %b %Y"))
}

/// Rewrite every `Version:` line of `content`
///
/// The result always ends with a newline. Content without a `Version:` line
/// comes back unchanged apart from that.
pub fn replace_version_lines(content: &str, version: &str, date: NaiveDate) -> PrepResult<(String, usize)> {
  let pattern = Regex::new(VERSION_LINE)?;
  let replacement = version_line(version, date);

  let replaced = pattern.find_iter(content).count();
  let mut updated = pattern.replace_all(content, NoExpand(&replacement)).into_owned();
  if !updated.ends_with('\n') {
    updated.push('\n');
  }

  Ok((updated, replaced))
}

/// Compute the readme update without writing it
pub fn plan_readme_update(path: &Path, version: &str, date: NaiveDate) -> PrepResult<ReadmeUpdate> {
  require_file(path)?;
  let original = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let (content, replaced) = replace_version_lines(&original, version, date)?;

  Ok(ReadmeUpdate {
    changed: content != original,
    content,
    replaced,
  })
}

/// Rewrite the `Version:` lines of the readme at `path` in place
///
/// The file is left alone when the content would not change.
pub fn update_readme(path: &Path, version: &str, date: NaiveDate) -> PrepResult<ReadmeUpdate> {
  let update = plan_readme_update(path, version, date)?;
  if !update.changed {
    return Ok(update);
  }
  write_atomic(path, &update.content)?;
  tracing::debug!(path = %path.display(), replaced = update.replaced, "updated readme");
  Ok(update)
}

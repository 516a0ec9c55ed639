use super::{require_file, write_atomic};
use crate::core::error::{DocumentError, PrepResult, ResultExt};
use std::fs;
use std::path::Path;

/// Insert `block` after the first `header_lines` lines of `content`
///
/// Everything after the insertion point is kept byte for byte. Returns `None`
/// when `content` has fewer than `header_lines` lines.
pub fn splice_after_lines(content: &str, header_lines: usize, block: &str) -> Option<String> {
  let mut offset = 0;
  let mut seen = 0;
  for line in content.split_inclusive('\n') {
    if seen == header_lines {
      break;
    }
    offset += line.len();
    seen += 1;
  }

  if seen < header_lines {
    return None;
  }

  let (head, tail) = content.split_at(offset);
  let mut spliced = String::with_capacity(content.len() + block.len() + 1);
  spliced.push_str(head);
  // last header line had no newline (file ends right there)
  if !head.is_empty() && !head.ends_with('\n') {
    spliced.push('\n');
  }
  spliced.push_str(block);
  spliced.push_str(tail);

  Some(spliced)
}

/// Insert `block` into the changelog at `path` below its header lines
pub fn insert_changelog_block(path: &Path, header_lines: usize, block: &str) -> PrepResult<()> {
  require_file(path)?;
  let original = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

  let updated = splice_after_lines(&original, header_lines, block).ok_or_else(|| {
    DocumentError::InsertionPointOutOfRange {
      path: path.to_path_buf(),
      lines: original.split_inclusive('\n').count(),
      required: header_lines,
    }
  })?;

  write_atomic(path, &updated)?;
  tracing::debug!(path = %path.display(), header_lines, block_bytes = block.len(), "inserted changelog block");
  Ok(())
}

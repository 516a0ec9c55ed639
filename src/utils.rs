//! Small helpers shared by commands and the git backend

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Fill `{version}` and `{file}` placeholders of a commit message template
pub fn expand_message(template: &str, version: &str, file: &Path) -> String {
  let file_name = file
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| file.to_string_lossy().into_owned());

  template.replace("{version}", version).replace("{file}", &file_name)
}

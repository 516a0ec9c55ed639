//! Release file for the project website
//!
//! The website keeps one YAML file per release. release-prep only prints it;
//! the release manager pastes it into the website repository.

use crate::core::error::ReleaseError;
use crate::tracker::ReleaseRecord;
use std::fmt;

/// Marker for values someone still has to fill in
pub const PLACEHOLDER: &str = "<TBD>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteReleaseTemplate {
  pub version: String,
  pub version_family: String,
  pub date: String,
  pub stable: bool,
  pub announcement_url: String,
  pub summary: String,
  pub displayed: bool,
}

impl WebsiteReleaseTemplate {
  pub fn from_release(release: &ReleaseRecord) -> Result<Self, ReleaseError> {
    let version = release.name.clone();
    let version_family = version_family(&version)?;

    let summary = release
      .description
      .as_deref()
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .unwrap_or(PLACEHOLDER)
      .to_string();

    Ok(Self {
      stable: version.contains("Final"),
      date: release.release_date.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
      announcement_url: PLACEHOLDER.to_string(),
      displayed: true,
      version,
      version_family,
      summary,
    })
  }

  /// YAML body of the release file
  pub fn render(&self) -> String {
    format!(
      "version: {}\n\
       version_family: {}\n\
       date: {}\n\
       stable: {}\n\
       announcement_url: {}\n\
       summary: {}\n\
       displayed: {}\n",
      self.version, self.version_family, self.date, self.stable, self.announcement_url, self.summary, self.displayed
    )
  }

  /// Shell snippet that writes the release file under `releases_dir`
  pub fn render_command(&self, releases_dir: &str) -> String {
    format!(
      "cat <<EOF > {}/{}.yml\n{}EOF\n",
      releases_dir.trim_end_matches('/'),
      self.version,
      self.render()
    )
  }
}

impl fmt::Display for WebsiteReleaseTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}

/// `<major>.<minor>` of a version label like `5.3.2.Final`
pub fn version_family(version: &str) -> Result<String, ReleaseError> {
  let mut parts = version.split('.');
  let is_number = |s: &&str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

  match (parts.next().filter(is_number), parts.next().filter(is_number)) {
    (Some(major), Some(minor)) => Ok(format!("{}.{}", major, minor)),
    _ => Err(ReleaseError::MalformedVersion {
      version: version.to_string(),
    }),
  }
}

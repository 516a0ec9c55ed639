//! Release lookup and validation
//!
//! Maintains the invariant: anything rendered for a release comes from a
//! tracker version that exists and is marked released.

use crate::core::error::{PrepResult, ReleaseError};
use crate::tracker::{ReleaseRecord, Tracker};

/// Most near-miss names suggested when a version is not found
const MAX_CANDIDATES: usize = 5;

/// Resolves version labels against the tracker's release list
pub struct ReleaseResolver<'a> {
  tracker: &'a dyn Tracker,
}

impl<'a> ReleaseResolver<'a> {
  pub fn new(tracker: &'a dyn Tracker) -> Self {
    Self { tracker }
  }

  /// Fetch the project's versions and return the released one named `version`
  pub fn resolve(&self, version: &str) -> PrepResult<ReleaseRecord> {
    let versions = self.tracker.list_versions()?;
    let release = select_release(&versions, version)?;
    tracing::debug!(version, release_date = ?release.release_date, "resolved release");
    Ok(release.clone())
  }
}

/// Pick the first record named exactly `version` and require it to be released
pub fn select_release<'r>(versions: &'r [ReleaseRecord], version: &str) -> Result<&'r ReleaseRecord, ReleaseError> {
  let Some(release) = versions.iter().find(|r| r.name == version) else {
    return Err(ReleaseError::NotFound {
      version: version.to_string(),
      candidates: near_misses(versions, version),
    });
  };

  if !release.released {
    return Err(ReleaseError::NotReleased {
      version: version.to_string(),
    });
  }

  Ok(release)
}

/// Names that differ only by case or contain / are contained in `version`
fn near_misses(versions: &[ReleaseRecord], version: &str) -> Vec<String> {
  let wanted = version.to_lowercase();
  if wanted.is_empty() {
    return Vec::new();
  }

  versions
    .iter()
    .filter(|r| {
      let name = r.name.to_lowercase();
      name.contains(&wanted) || wanted.contains(&name)
    })
    .take(MAX_CANDIDATES)
    .map(|r| r.name.clone())
    .collect()
}

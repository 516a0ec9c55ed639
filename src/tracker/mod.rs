//! Read-only issue tracker access
//!
//! - **models**: release records and issues as the rest of the crate sees them
//! - **jira**: blocking Jira REST client (versions list + paginated JQL search)

pub mod jira;
pub mod models;

pub use jira::JiraClient;
pub use models::{Issue, ReleaseRecord};

use crate::core::error::PrepResult;

/// Queries the release tooling needs from an issue tracker
pub trait Tracker {
  /// All versions defined for the project, in tracker order
  fn list_versions(&self) -> PrepResult<Vec<ReleaseRecord>>;

  /// Issues whose fix version is `version`, ordered by issue type ascending
  fn list_issues(&self, version: &str) -> PrepResult<Vec<Issue>>;
}

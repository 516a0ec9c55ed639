//! Changelog block generation from tracker issues
//!
//! Produces the plain-text section that is spliced into `changelog.txt`:
//!
//! ```text
//! <version> (<DD-MM-YYYY>)
//! -------------------------
//!
//! ** <issue type 1>
//!     * OGM-<n> - <component>   - <summary>
//!     ...
//!
//! ** <issue type 2>
//!     * OGM-<n>                   <summary>
//!     ...
//!
//! ```
//!
//! The layout is consumed by people and scripts reading the changelog, so the
//! column widths below are part of the format.

use crate::tracker::Issue;
use chrono::NaiveDate;
use std::fmt;

/// Width of the dashed rule under the header
pub const SEPARATOR_WIDTH: usize = 25;

/// Width the first component name is padded to
const COMPONENT_WIDTH: usize = 13;

/// `"- "` + component column + `" - "`, used as blank padding without a component
const COMPONENT_COLUMN_WIDTH: usize = COMPONENT_WIDTH + 5;

/// Issues of one type, in tracker order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueGroup {
  pub issue_type: String,
  pub issues: Vec<Issue>,
}

/// Changelog section for one release
#[derive(Debug, Clone)]
pub struct ChangelogBlock {
  version: String,
  date: NaiveDate,
  groups: Vec<IssueGroup>,
}

impl ChangelogBlock {
  /// Group `issues` into runs of equal issue type
  ///
  /// The tracker already returns issues ordered by type; adjacent equal types
  /// are merged and nothing is re-sorted, so a type that shows up again later
  /// starts a new group.
  pub fn build(version: impl Into<String>, issues: Vec<Issue>, date: NaiveDate) -> Self {
    let mut groups: Vec<IssueGroup> = Vec::new();

    for issue in issues {
      match groups.last_mut() {
        Some(group) if group.issue_type == issue.issue_type => group.issues.push(issue),
        _ => groups.push(IssueGroup {
          issue_type: issue.issue_type.clone(),
          issues: vec![issue],
        }),
      }
    }

    Self {
      version: version.into(),
      date,
      groups,
    }
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn groups(&self) -> &[IssueGroup] {
    &self.groups
  }

  pub fn issue_count(&self) -> usize {
    self.groups.iter().map(|g| g.issues.len()).sum()
  }

  /// Header line, e.g. `5.3.2.Final (15-01-2024)`
  pub fn header(&self) -> String {
    format!("{} ({})", self.version, self.date.format("%d-%m-%Y"))
  }

  /// Render the block; always ends with an empty line
  pub fn render(&self) -> String {
    let mut output = String::new();

    output.push_str(&self.header());
    output.push('\n');
    output.push_str(&"-".repeat(SEPARATOR_WIDTH));
    output.push('\n');

    for group in &self.groups {
      output.push_str("\n** ");
      output.push_str(&group.issue_type);
      output.push('\n');

      for issue in &group.issues {
        output.push_str(&issue_line(issue));
        output.push('\n');
      }
    }

    output.push('\n');
    output
  }
}

impl fmt::Display for ChangelogBlock {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}

/// One issue line; only the first component is shown
fn issue_line(issue: &Issue) -> String {
  let component = match issue.primary_component() {
    Some(name) => format!("- {:<width$} - ", name, width = COMPONENT_WIDTH),
    None => " ".repeat(COMPONENT_COLUMN_WIDTH),
  };

  format!("    * {} {}{}", issue.key, component, issue.summary)
}

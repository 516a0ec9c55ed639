use serde::Deserialize;

/// One project version as reported by the tracker
///
/// Deserializes straight from a Jira version object:
///
/// ```json
/// {
///   "id": "18754",
///   "description": "Bugfixes for MongoDB, Neo4j and CouchDB backends",
///   "name": "4.1.2.Final",
///   "archived": false,
///   "released": true,
///   "releaseDate": "2015-02-27"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRecord {
  #[serde(default)]
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub release_date: Option<String>,
  #[serde(default)]
  pub released: bool,
  #[serde(default)]
  pub archived: bool,
}

/// One tracked work item attributed to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
  pub key: String,
  pub issue_type: String,
  pub components: Vec<String>,
  pub summary: String,
}

impl Issue {
  pub fn new(key: impl Into<String>, issue_type: impl Into<String>, summary: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      issue_type: issue_type.into(),
      components: Vec::new(),
      summary: summary.into(),
    }
  }

  pub fn with_components<I, S>(mut self, components: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.components = components.into_iter().map(Into::into).collect();
    self
  }

  /// First listed component; the changelog only ever shows this one
  pub fn primary_component(&self) -> Option<&str> {
    self.components.first().map(String::as_str)
  }
}

/// Page of a Jira `/search` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
  #[serde(default)]
  pub total: usize,
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JiraIssue {
  pub key: String,
  pub fields: JiraIssueFields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JiraIssueFields {
  pub issuetype: Named,
  #[serde(default)]
  pub components: Vec<Named>,
  #[serde(default)]
  pub summary: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Named {
  pub name: String,
}

impl From<JiraIssue> for Issue {
  fn from(issue: JiraIssue) -> Self {
    Self {
      key: issue.key,
      issue_type: issue.fields.issuetype.name,
      components: issue.fields.components.into_iter().map(|c| c.name).collect(),
      summary: issue.fields.summary,
    }
  }
}

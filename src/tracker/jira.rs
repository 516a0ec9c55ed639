//! Blocking Jira REST client
//!
//! Two endpoints are used:
//! - `GET /rest/api/2/project/{key}/versions` for the release list
//! - `GET /rest/api/2/search` with a JQL query for the issues of one fix version
//!
//! No retries. The request timeout comes from `[tracker] timeout_secs`.

use super::models::{Issue, ReleaseRecord, SearchPage};
use super::Tracker;
use crate::core::config::TrackerConfig;
use crate::core::error::{ConfigError, PrepResult, TrackerError};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fields requested from the search endpoint
const ISSUE_FIELDS: &str = "summary,issuetype,components";

/// Longest error body echoed back to the user
const MAX_ERROR_BODY: usize = 512;

pub struct JiraClient {
  client: Client,
  base: String,
  project: String,
  page_size: usize,
  auth: Option<(String, String)>,
}

impl JiraClient {
  /// Build a client from tracker settings
  ///
  /// When `username` is set, the API token is read from the `token_env` variable.
  pub fn new(config: &TrackerConfig) -> PrepResult<Self> {
    let base = config.require_base_url()?.to_string();
    let project = config.require_project()?.to_string();

    let auth = match &config.username {
      Some(user) => {
        let token = std::env::var(&config.token_env).map_err(|_| ConfigError::MissingField {
          field: format!("{} environment variable (API token for {})", config.token_env, user),
        })?;
        Some((user.clone(), token))
      }
      None => None,
    };

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| TrackerError::Request {
        url: base.clone(),
        message: e.to_string(),
      })?;

    Ok(Self {
      client,
      base,
      project,
      page_size: config.page_size,
      auth,
    })
  }

  fn versions_url(&self) -> String {
    format!("{}/rest/api/2/project/{}/versions", self.base, self.project)
  }

  fn search_url(&self) -> String {
    format!("{}/rest/api/2/search", self.base)
  }

  fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> PrepResult<T> {
    tracing::debug!(url, ?query, "tracker request");

    let mut request = self.client.get(url).header(ACCEPT, "application/json").query(query);
    if let Some((user, token)) = &self.auth {
      request = request.basic_auth(user, Some(token));
    }

    let response = request.send().map_err(|e| TrackerError::Request {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    let status = response.status();
    let body = response.text().map_err(|e| TrackerError::Request {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    if !status.is_success() {
      return Err(
        TrackerError::Status {
          url: url.to_string(),
          status: status.as_u16(),
          body: truncate(body, MAX_ERROR_BODY),
        }
        .into(),
      );
    }

    serde_json::from_str(&body).map_err(|e| {
      TrackerError::Decode {
        url: url.to_string(),
        message: e.to_string(),
      }
      .into()
    })
  }
}

impl Tracker for JiraClient {
  fn list_versions(&self) -> PrepResult<Vec<ReleaseRecord>> {
    let versions: Vec<ReleaseRecord> = self.get_json(&self.versions_url(), &[])?;
    tracing::debug!(project = %self.project, count = versions.len(), "fetched versions");
    Ok(versions)
  }

  fn list_issues(&self, version: &str) -> PrepResult<Vec<Issue>> {
    let url = self.search_url();
    let jql = issues_jql(&self.project, version);
    let mut issues = Vec::new();

    loop {
      let query = [
        ("jql", jql.clone()),
        ("startAt", issues.len().to_string()),
        ("maxResults", self.page_size.to_string()),
        ("fields", ISSUE_FIELDS.to_string()),
      ];
      let page: SearchPage = self.get_json(&url, &query)?;
      let fetched = page.issues.len();
      issues.extend(page.issues.into_iter().map(Issue::from));

      if fetched == 0 || issues.len() >= page.total {
        break;
      }
    }

    tracing::debug!(version, count = issues.len(), "fetched issues");
    Ok(issues)
  }
}

/// JQL selecting a fix version's issues, ordered by issue type
pub fn issues_jql(project: &str, version: &str) -> String {
  format!(
    "project = {} AND fixVersion = {} ORDER BY issuetype ASC",
    jql_string(project),
    jql_string(version)
  )
}

/// Quote a JQL string literal
fn jql_string(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn truncate(mut body: String, max: usize) -> String {
  if body.len() > max {
    let mut end = max;
    while !body.is_char_boundary(end) {
      end -= 1;
    }
    body.truncate(end);
    body.push('…');
  }
  body
}

//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tiny_http::{Header, Response, Server, StatusCode};
use url::form_urlencoded;

pub const README: &str = "Hibernate OGM\n\
                          =============\n\
                          \n\
                          Version: 4.1.1.Final - 13 Jan 2015\n\
                          \n\
                          Persist domain models in NoSQL datastores.\n";

pub const CHANGELOG: &str = "Hibernate OGM Changelog\n\
                             =======================\n\
                             \n\
                             Note: entries are newest first.\n\
                             4.1.1.Final (13-01-2015)\n\
                             -------------------------\n";

/// A git repository holding a readme and a changelog
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("readme.md"), README)?;
    std::fs::write(path.join("changelog.txt"), CHANGELOG)?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Commit subjects, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Paths with uncommitted changes
  pub fn dirty_files(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["status", "--porcelain"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l[3..].to_string())
        .collect(),
    )
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    Ok(std::fs::write(self.path.join(path), content)?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run release-prep and return its output whatever the exit status
pub fn run_release_prep_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_release-prep"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .env_remove("JIRA_API_TOKEN")
    .output()
    .context("Failed to run release-prep")
}

/// Run release-prep and require success
pub fn run_release_prep(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_release_prep_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "release-prep failed: release-prep {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// Issue tracker stub
// ============================================================================

/// One request seen by the stub
#[derive(Debug, Clone)]
pub struct StubRequest {
  pub path: String,
  pub query: HashMap<String, String>,
}

/// Local HTTP server answering tracker requests from a closure
///
/// Serves forever on a background thread; the thread dies with the test process.
pub struct TrackerStub {
  pub url: String,
  requests: Arc<Mutex<Vec<StubRequest>>>,
}

impl TrackerStub {
  pub fn start<F>(handler: F) -> Result<Self>
  where
    F: Fn(&StubRequest) -> (u16, String) + Send + 'static,
  {
    let server = Server::http("127.0.0.1:0").map_err(|e| anyhow::anyhow!("Failed to start tracker stub: {}", e))?;
    let addr = server.server_addr().to_ip().context("Tracker stub is not listening on TCP")?;
    let url = format!("http://{}", addr);
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&requests);
    std::thread::spawn(move || {
      for request in server.incoming_requests() {
        let stub_request = parse_request(request.url());
        let (status, body) = handler(&stub_request);
        if let Ok(mut all) = seen.lock() {
          all.push(stub_request);
        }

        let response = Response::from_string(body)
          .with_status_code(StatusCode(status))
          .with_header(Header::from_bytes("Content-Type", "application/json").expect("content type header"));
        let _ = request.respond(response);
      }
    });

    Ok(Self { url, requests })
  }

  /// Stub for project OGM with the given versions and issues
  ///
  /// `issues` is served through the paginated search endpoint.
  pub fn jira(versions: serde_json::Value, issues: Vec<serde_json::Value>) -> Result<Self> {
    Self::start(move |req| {
      if req.path == "/rest/api/2/project/OGM/versions" {
        return (200, versions.to_string());
      }
      if req.path == "/rest/api/2/search" {
        let start: usize = req.query.get("startAt").and_then(|s| s.parse().ok()).unwrap_or(0);
        let max: usize = req.query.get("maxResults").and_then(|s| s.parse().ok()).unwrap_or(50);
        let page: Vec<_> = issues.iter().skip(start).take(max).cloned().collect();
        let body = serde_json::json!({
          "startAt": start,
          "maxResults": max,
          "total": issues.len(),
          "issues": page,
        });
        return (200, body.to_string());
      }
      (404, r#"{"errorMessages":["not found"]}"#.to_string())
    })
  }

  pub fn requests(&self) -> Vec<StubRequest> {
    self.requests.lock().map(|r| r.clone()).unwrap_or_default()
  }
}

/// Split a request target into its path and decoded query parameters
fn parse_request(target: &str) -> StubRequest {
  let (path, query) = target.split_once('?').unwrap_or((target, ""));
  StubRequest {
    path: path.to_string(),
    query: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
  }
}

// ============================================================================
// Tracker payloads
// ============================================================================

pub fn version_json(name: &str, released: bool, description: Option<&str>) -> serde_json::Value {
  let mut value = serde_json::json!({
    "self": format!("https://tracker.example/rest/api/2/version/{}", name),
    "id": "18754",
    "name": name,
    "archived": false,
    "released": released,
    "releaseDate": "2015-02-27",
    "projectId": 10160,
  });
  if let Some(description) = description {
    value["description"] = serde_json::Value::String(description.to_string());
  }
  value
}

pub fn issue_json(key: &str, issue_type: &str, components: &[&str], summary: &str) -> serde_json::Value {
  let components: Vec<_> = components.iter().map(|c| serde_json::json!({ "name": c })).collect();
  serde_json::json!({
    "id": "1",
    "key": key,
    "fields": {
      "summary": summary,
      "issuetype": { "name": issue_type },
      "components": components,
    }
  })
}

#[test]
fn test_stub_query_decoding() {
  let req = parse_request("/rest/api/2/search?jql=project+%3D+%22OGM%22&startAt=0&fields=a%2Cb&x=a%41");
  assert_eq!(req.path, "/rest/api/2/search");
  assert_eq!(req.query["jql"], r#"project = "OGM""#);
  assert_eq!(req.query["fields"], "a,b");
  assert_eq!(req.query["x"], "aA");
}

//! Integration tests for the pre-release run

use crate::helpers::{
  CHANGELOG, README, TestWorkspace, TrackerStub, git, issue_json, run_release_prep, run_release_prep_raw, stderr, stdout,
  version_json,
};
use anyhow::Result;
use serde_json::json;

fn ogm_stub() -> Result<TrackerStub> {
  TrackerStub::jira(
    json!([
      version_json("4.1.1.Final", true, None),
      version_json("4.1.2.Final", true, Some("Bugfixes for MongoDB")),
      version_json("5.0.0.Alpha1", false, None),
    ]),
    vec![
      issue_json("OGM-1", "Bug", &["mongodb", "core"], "Fix lost update"),
      issue_json("OGM-2", "Bug", &[], "Crash on startup"),
      issue_json("OGM-3", "Improvement", &["core"], "Faster queries"),
    ],
  )
}

fn expected_changelog() -> String {
  let mut lines = vec![
    "Hibernate OGM Changelog",
    "=======================",
    "",
    "Note: entries are newest first.",
    "4.1.2.Final (27-02-2015)",
    "-------------------------",
    "",
    "** Bug",
    "    * OGM-1 - mongodb       - Fix lost update",
    "    * OGM-2                   Crash on startup",
    "",
    "** Improvement",
    "    * OGM-3 - core          - Faster queries",
    "",
    "4.1.1.Final (13-01-2015)",
    "-------------------------",
  ];
  lines.push("");
  lines.join("\n")
}

#[test]
fn test_full_release_updates_and_commits_both_files() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep(
    &ws.path,
    &[
      "-v",
      "4.1.2.Final",
      "-r",
      "readme.md",
      "-c",
      "changelog.txt",
      "--tracker-url",
      &stub.url,
      "--project",
      "OGM",
      "--as-of",
      "2015-02-27",
    ],
  )?;

  let readme = ws.read_file("readme.md")?;
  assert!(readme.contains("Version: 4.1.2.Final - 27 Feb 2015\n"), "readme:\n{}", readme);
  assert!(!readme.contains("4.1.1.Final"));
  assert!(readme.ends_with("Persist domain models in NoSQL datastores.\n"));

  assert_eq!(ws.read_file("changelog.txt")?, expected_changelog());

  let log = ws.git_log(3)?;
  assert_eq!(
    log,
    vec![
      "[Jenkins release job] changelog.txt updated by release build 4.1.2.Final".to_string(),
      "[Jenkins release job] readme.md updated by release build 4.1.2.Final".to_string(),
      "Initial project setup".to_string(),
    ]
  );
  assert!(ws.dirty_files()?.is_empty());

  let out = stdout(&output);
  assert!(out.contains("📦 Release 4.1.2.Final"), "stdout:\n{}", out);
  Ok(())
}

#[test]
fn test_issue_search_is_paginated() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  ws.write_file(
    "release-prep.toml",
    &format!(
      "[tracker]\nbase_url = \"{}\"\nproject = \"OGM\"\npage_size = 2\n",
      stub.url
    ),
  )?;

  run_release_prep(
    &ws.path,
    &["-v", "4.1.2.Final", "-c", "changelog.txt", "--no-commit", "--as-of", "2015-02-27"],
  )?;

  let searches: Vec<_> = stub
    .requests()
    .into_iter()
    .filter(|r| r.path == "/rest/api/2/search")
    .collect();
  let starts: Vec<_> = searches.iter().map(|r| r.query["startAt"].clone()).collect();
  assert_eq!(starts, vec!["0".to_string(), "2".to_string()]);
  assert_eq!(searches[0].query["maxResults"], "2");
  assert_eq!(
    searches[0].query["jql"],
    r#"project = "OGM" AND fixVersion = "4.1.2.Final" ORDER BY issuetype ASC"#
  );

  assert_eq!(ws.read_file("changelog.txt")?, expected_changelog());

  // --no-commit leaves the change in the working tree
  assert_eq!(ws.git_log(5)?.len(), 1);
  let dirty = ws.dirty_files()?;
  assert!(dirty.contains(&"changelog.txt".to_string()), "{:?}", dirty);
  assert!(!dirty.contains(&"readme.md".to_string()));
  Ok(())
}

#[test]
fn test_unknown_version_fails_without_touching_files() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep_raw(
    &ws.path,
    &[
      "-v",
      "4.1.3.Final",
      "-r",
      "readme.md",
      "-c",
      "changelog.txt",
      "--tracker-url",
      &stub.url,
      "--project",
      "OGM",
    ],
  )?;

  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("Version 4.1.3.Final does not exist in the issue tracker"), "stderr:\n{}", err);

  assert_eq!(ws.read_file("readme.md")?, README);
  assert_eq!(ws.read_file("changelog.txt")?, CHANGELOG);
  assert_eq!(ws.git_log(5)?.len(), 1);
  Ok(())
}

#[test]
fn test_unreleased_version_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep_raw(
    &ws.path,
    &["-v", "5.0.0.Alpha1", "-w", "--tracker-url", &stub.url, "--project", "OGM"],
  )?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Version 5.0.0.Alpha1 is not yet released"));
  assert!(!stdout(&output).contains("cat <<EOF"));
  Ok(())
}

#[test]
fn test_missing_readme_fails_before_querying_tracker() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep_raw(
    &ws.path,
    &["-v", "4.1.2.Final", "-r", "docs/missing.md", "--tracker-url", &stub.url, "--project", "OGM"],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("missing.md is not a valid file"));
  assert!(stub.requests().is_empty());
  Ok(())
}

#[test]
fn test_website_template_is_printed() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep(
    &ws.path,
    &["-v", "4.1.2.Final", "-w", "--tracker-url", &stub.url, "--project", "OGM"],
  )?;

  let out = stdout(&output);
  assert!(out.contains("=====\ncat <<EOF > _data/projects/ogm/releases/4.1.2.Final.yml\n"), "stdout:\n{}", out);
  assert!(out.contains("version: 4.1.2.Final\n"));
  assert!(out.contains("version_family: 4.1\n"));
  assert!(out.contains("date: 2015-02-27\n"));
  assert!(out.contains("stable: true\n"));
  assert!(out.contains("announcement_url: <TBD>\n"));
  assert!(out.contains("summary: Bugfixes for MongoDB\n"));
  assert!(out.contains("displayed: true\nEOF\n=====\n"));

  // Printing the template never writes or commits
  assert!(ws.dirty_files()?.is_empty());
  assert_eq!(ws.git_log(5)?.len(), 1);
  Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;

  let output = run_release_prep(
    &ws.path,
    &[
      "-v",
      "4.1.2.Final",
      "-r",
      "readme.md",
      "-c",
      "changelog.txt",
      "--dry-run",
      "--tracker-url",
      &stub.url,
      "--project",
      "OGM",
      "--as-of",
      "2015-02-27",
    ],
  )?;

  let out = stdout(&output);
  assert!(out.contains("4.1.2.Final (27-02-2015)"));
  assert!(out.contains("Would commit: [Jenkins release job] readme.md updated by release build 4.1.2.Final"));

  assert_eq!(ws.read_file("readme.md")?, README);
  assert_eq!(ws.read_file("changelog.txt")?, CHANGELOG);
  assert_eq!(ws.git_log(5)?.len(), 1);
  Ok(())
}

#[test]
fn test_tracker_error_status_is_reported() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = TrackerStub::start(|_| (500, r#"{"errorMessages":["boom"]}"#.to_string()))?;

  let output = run_release_prep_raw(
    &ws.path,
    &["-v", "4.1.2.Final", "-w", "--tracker-url", &stub.url, "--project", "OGM"],
  )?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("500"));
  Ok(())
}

#[test]
fn test_empty_tracker_url_is_a_config_error() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_release_prep_raw(&ws.path, &["-v", "4.1.2.Final", "-w", "--tracker-url="])?;

  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Missing required configuration: tracker.base_url"), "stderr:\n{}", err);
  Ok(())
}

#[test]
fn test_readme_without_version_line_still_updates_changelog() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let stub = ogm_stub()?;
  let readme = "Hibernate OGM\n=============\n\nNo version line here.\n";
  ws.write_file("readme.md", readme)?;
  git(&ws.path, &["commit", "-am", "Drop version line"])?;

  let output = run_release_prep(
    &ws.path,
    &[
      "-v",
      "4.1.2.Final",
      "-r",
      "readme.md",
      "-c",
      "changelog.txt",
      "--tracker-url",
      &stub.url,
      "--as-of",
      "2015-02-27",
    ],
  )?;

  let out = stdout(&output);
  assert!(out.contains("No 'Version:' line in"), "stdout:\n{}", out);
  assert_eq!(ws.read_file("readme.md")?, readme);
  assert_eq!(ws.read_file("changelog.txt")?, expected_changelog());

  let log = ws.git_log(2)?;
  assert_eq!(
    log,
    vec![
      "[Jenkins release job] changelog.txt updated by release build 4.1.2.Final".to_string(),
      "Drop version line".to_string(),
    ]
  );
  assert!(ws.dirty_files()?.is_empty());
  Ok(())
}

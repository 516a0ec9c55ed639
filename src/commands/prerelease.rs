//! Pre-release command implementation
//!
//! Runs the release-time bookkeeping for one version, in this order:
//! 1. Check the readme / changelog paths that were asked for
//! 2. Resolve the version in the tracker (must exist and be released)
//! 3. Print the website release file
//! 4. Rewrite the readme `Version:` line and commit it
//! 5. Insert the changelog block and commit it
//!
//! The first failure aborts the run. Earlier writes and commits stay in place.

use crate::core::context::PrepContext;
use crate::core::error::PrepResult;
use crate::core::vcs::CommitGateway;
use crate::documents::{self, insert_changelog_block, plan_readme_update, update_readme};
use crate::release::{ChangelogBlock, ReleaseResolver, WebsiteReleaseTemplate};
use crate::tracker::{ReleaseRecord, Tracker};
use crate::utils::expand_message;
use std::path::{Path, PathBuf};

/// What to do for the release
#[derive(Debug, Clone, Default)]
pub struct PrereleaseOptions {
  pub version: String,
  pub website_template: bool,
  pub readme: Option<PathBuf>,
  pub changelog: Option<PathBuf>,
  /// Print what would change; write and commit nothing
  pub dry_run: bool,
  /// Write files but leave committing to the caller
  pub no_commit: bool,
}

/// Run the pre-release command
pub fn run_prerelease(
  ctx: &PrepContext,
  opts: &PrereleaseOptions,
  tracker: &dyn Tracker,
  gateway: &dyn CommitGateway,
) -> PrepResult<()> {
  let readme = opts.readme.as_deref().map(|p| ctx.resolve_path(p));
  let changelog = opts.changelog.as_deref().map(|p| ctx.resolve_path(p));

  for path in readme.iter().chain(changelog.iter()) {
    documents::require_file(path)?;
  }

  let release = ReleaseResolver::new(tracker).resolve(&opts.version)?;
  println!("📦 Release {} ({})", release.name, release.release_date.as_deref().unwrap_or("no release date"));

  if opts.website_template {
    print_website_template(ctx, &release)?;
  }

  if let Some(path) = &readme {
    process_readme(ctx, opts, path, gateway)?;
  }

  if let Some(path) = &changelog {
    process_changelog(ctx, opts, path, tracker, gateway)?;
  }

  if opts.dry_run {
    println!();
    println!("🔍 Dry-run mode (no changes applied)");
  }

  Ok(())
}

fn print_website_template(ctx: &PrepContext, release: &ReleaseRecord) -> PrepResult<()> {
  let template = WebsiteReleaseTemplate::from_release(release)?;
  let project = ctx.config.tracker.project.as_deref().unwrap_or_default();

  println!();
  println!("Run the following command in the website repository to create the release announcement file:");
  println!();
  println!("=====");
  print!("{}", template.render_command(&ctx.config.website.releases_dir(project)));
  println!("=====");

  Ok(())
}

fn process_readme(ctx: &PrepContext, opts: &PrereleaseOptions, path: &Path, gateway: &dyn CommitGateway) -> PrepResult<()> {
  println!();

  let update = if opts.dry_run {
    plan_readme_update(path, &opts.version, ctx.as_of)?
  } else {
    update_readme(path, &opts.version, ctx.as_of)?
  };

  if update.replaced == 0 {
    println!("⚠️  No 'Version:' line in {}", path.display());
  } else if update.changed {
    println!("✅ {}: {} 'Version:' line(s) updated", path.display(), update.replaced);
  } else {
    println!("✅ {}: already at {}", path.display(), opts.version);
  }

  if !update.changed {
    println!("   Nothing to commit for {}", path.display());
    return Ok(());
  }

  let message = expand_message(&ctx.config.readme.commit_message, &opts.version, path);
  commit(opts, path, &message, gateway)
}

fn process_changelog(
  ctx: &PrepContext,
  opts: &PrereleaseOptions,
  path: &Path,
  tracker: &dyn Tracker,
  gateway: &dyn CommitGateway,
) -> PrepResult<()> {
  println!();

  let issues = tracker.list_issues(&opts.version)?;
  let block = ChangelogBlock::build(&opts.version, issues, ctx.as_of);
  let header_lines = ctx.config.changelog.header_lines;

  if opts.dry_run {
    println!(
      "Changelog entry for {} in {} (after line {}):",
      block.version(),
      path.display(),
      header_lines
    );
    println!();
    print!("{}", block);
  } else {
    insert_changelog_block(path, header_lines, &block.render())?;
    println!(
      "✅ {}: {} issue(s) in {} group(s) added",
      path.display(),
      block.issue_count(),
      block.groups().len()
    );
  }

  let message = expand_message(&ctx.config.changelog.commit_message, &opts.version, path);
  commit(opts, path, &message, gateway)
}

fn commit(opts: &PrereleaseOptions, path: &Path, message: &str, gateway: &dyn CommitGateway) -> PrepResult<()> {
  if opts.dry_run {
    println!("   Would commit: {}", message);
    return Ok(());
  }
  if opts.no_commit {
    println!("   Not committed (--no-commit)");
    return Ok(());
  }

  let sha = gateway.commit_file(path, message)?;
  println!("   Committed {}: {}", &sha[..sha.len().min(7)], message);
  Ok(())
}

mod commands;
mod core;
mod documents;
mod logging;
mod release;
mod tracker;
mod utils;

use crate::core::config::ConfigOverrides;
use crate::core::context::PrepContext;
use crate::core::error::{PrepError, PrepResult, print_error};
use crate::core::vcs::GitCommitGateway;
use crate::tracker::JiraClient;
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Pre-release bookkeeping: readme, changelog and website release file from the issue tracker
#[derive(Parser)]
#[command(name = "release-prep")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  // ============================================================================
  // Required
  // ============================================================================
  /// The release version to process (must exist and be released in the tracker)
  #[arg(short = 'v', long, value_name = "VERSION")]
  release_version: String,

  // ============================================================================
  // Optional tasks
  // ============================================================================
  /// Print the website release file for this version
  #[arg(short = 'w', long)]
  create_website_release_template: bool,

  /// Update the `Version:` line of this readme and commit it
  #[arg(short = 'r', long, value_name = "PATH")]
  update_readme: Option<PathBuf>,

  /// Insert this version's entry into this changelog and commit it
  #[arg(short = 'c', long = "update-change-log", value_name = "PATH")]
  update_change_log: Option<PathBuf>,

  // ============================================================================
  // Settings
  // ============================================================================
  /// Config file (default: release-prep.toml, .release-prep.toml or .config/release-prep.toml)
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Issue tracker base URL (overrides tracker.base_url)
  #[arg(long, value_name = "URL")]
  tracker_url: Option<String>,

  /// Issue tracker project key (overrides tracker.project)
  #[arg(long, value_name = "KEY")]
  project: Option<String>,

  /// Date written to the readme and changelog (default: today)
  #[arg(long, value_name = "YYYY-MM-DD")]
  as_of: Option<NaiveDate>,

  /// Changelog lines kept above the new entry (overrides changelog.header_lines)
  #[arg(long, value_name = "N")]
  header_lines: Option<usize>,

  /// Show what would change without writing or committing anything
  #[arg(long, conflicts_with = "no_commit")]
  dry_run: bool,

  /// Write files but do not commit them
  #[arg(long)]
  no_commit: bool,

  /// Log filter used when RUST_LOG is not set
  #[arg(long, value_name = "FILTER", default_value = "warn")]
  log_level: String,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init_logging(&cli.log_level);

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // "now" is taken once so every artifact carries the same date
  let as_of = cli.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

  if let Err(err) = run(cli, &workspace_root, as_of) {
    handle_error(err);
  }
}

fn run(cli: Cli, workspace_root: &Path, as_of: NaiveDate) -> PrepResult<()> {
  let overrides = ConfigOverrides {
    tracker_url: cli.tracker_url,
    project: cli.project,
    header_lines: cli.header_lines,
  };
  let ctx = PrepContext::build(workspace_root, cli.config.as_deref(), overrides, as_of)?;
  let tracker = JiraClient::new(&ctx.config.tracker)?;

  let opts = commands::PrereleaseOptions {
    version: cli.release_version,
    website_template: cli.create_website_release_template,
    readme: non_empty(cli.update_readme),
    changelog: non_empty(cli.update_change_log),
    dry_run: cli.dry_run,
    no_commit: cli.no_commit,
  };

  commands::run_prerelease(&ctx, &opts, &tracker, &GitCommitGateway)
}

/// `--update-readme=` with an empty value means "not requested"
fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
  path.filter(|p| !p.as_os_str().is_empty())
}

fn handle_error(err: PrepError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

use crate::core::error::{ConfigError, PrepResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Issue tracker used when neither the config file nor the command line names one
pub const DEFAULT_TRACKER_URL: &str = "https://hibernate.atlassian.net";

/// Project key used when neither the config file nor the command line names one
pub const DEFAULT_PROJECT: &str = "OGM";

/// Default number of lines kept above a freshly inserted changelog block
pub const DEFAULT_HEADER_LINES: usize = 4;

/// Default commit message for readme and changelog updates
pub const DEFAULT_COMMIT_MESSAGE: &str = "[Jenkins release job] {file} updated by release build {version}";

/// Configuration for release-prep
/// Searched in order: release-prep.toml, .release-prep.toml, .config/release-prep.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrepConfig {
  #[serde(default)]
  pub tracker: TrackerConfig,
  #[serde(default)]
  pub changelog: ChangelogConfig,
  #[serde(default)]
  pub readme: ReadmeConfig,
  #[serde(default)]
  pub website: WebsiteConfig,
}

/// Issue tracker connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
  /// Jira base URL
  #[serde(default = "default_base_url")]
  pub base_url: Option<String>,

  /// Jira project key
  #[serde(default = "default_project")]
  pub project: Option<String>,

  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,

  /// Issues requested per search page
  #[serde(default = "default_page_size")]
  pub page_size: usize,

  /// Basic auth user; the token is read from `token_env`
  #[serde(default)]
  pub username: Option<String>,

  /// Environment variable holding the API token
  #[serde(default = "default_token_env")]
  pub token_env: String,
}

fn default_base_url() -> Option<String> {
  Some(DEFAULT_TRACKER_URL.to_string())
}

fn default_project() -> Option<String> {
  Some(DEFAULT_PROJECT.to_string())
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_page_size() -> usize {
  100
}

fn default_token_env() -> String {
  "JIRA_API_TOKEN".to_string()
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      project: default_project(),
      timeout_secs: default_timeout_secs(),
      page_size: default_page_size(),
      username: None,
      token_env: default_token_env(),
    }
  }
}

impl TrackerConfig {
  /// Base URL without trailing slashes, or a missing-field error
  pub fn require_base_url(&self) -> PrepResult<&str> {
    self
      .base_url
      .as_deref()
      .map(|url| url.trim_end_matches('/'))
      .filter(|url| !url.is_empty())
      .ok_or_else(|| {
        ConfigError::MissingField {
          field: "tracker.base_url".to_string(),
        }
        .into()
      })
  }

  /// Project key, or a missing-field error
  pub fn require_project(&self) -> PrepResult<&str> {
    self
      .project
      .as_deref()
      .filter(|project| !project.trim().is_empty())
      .ok_or_else(|| {
        ConfigError::MissingField {
          field: "tracker.project".to_string(),
        }
        .into()
      })
  }

  pub fn validate(&self) -> PrepResult<()> {
    // an empty value is reported by require_base_url
    if let Some(url) = self.base_url.as_deref().filter(|url| !url.is_empty())
      && !(url.starts_with("http://") || url.starts_with("https://"))
    {
      return Err(
        ConfigError::Invalid {
          message: format!("tracker.base_url '{}' must start with http:// or https://", url),
        }
        .into(),
      );
    }

    if self.page_size == 0 {
      return Err(
        ConfigError::Invalid {
          message: "tracker.page_size must be at least 1".to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogConfig {
  /// Lines at the top of the changelog kept above new entries
  #[serde(default = "default_header_lines")]
  pub header_lines: usize,

  /// Commit message template (`{version}`, `{file}`)
  #[serde(default = "default_commit_message")]
  pub commit_message: String,
}

fn default_header_lines() -> usize {
  DEFAULT_HEADER_LINES
}

fn default_commit_message() -> String {
  DEFAULT_COMMIT_MESSAGE.to_string()
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      header_lines: default_header_lines(),
      commit_message: default_commit_message(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeConfig {
  /// Commit message template (`{version}`, `{file}`)
  #[serde(default = "default_commit_message")]
  pub commit_message: String,
}

impl Default for ReadmeConfig {
  fn default() -> Self {
    Self {
      commit_message: default_commit_message(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebsiteConfig {
  /// Directory of release files in the website repository
  /// (default: `_data/projects/<project>/releases`)
  #[serde(default)]
  pub releases_dir: Option<String>,
}

impl WebsiteConfig {
  pub fn releases_dir(&self, project: &str) -> String {
    self
      .releases_dir
      .clone()
      .unwrap_or_else(|| format!("_data/projects/{}/releases", project.to_lowercase()))
  }
}

/// Command line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub tracker_url: Option<String>,
  pub project: Option<String>,
  pub header_lines: Option<usize>,
}

impl PrepConfig {
  /// Find config file in search order: release-prep.toml, .release-prep.toml, .config/release-prep.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("release-prep.toml"),
      path.join(".release-prep.toml"),
      path.join(".config").join("release-prep.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config from an explicit file, or search `dir`; no file means defaults
  pub fn load(dir: &Path, explicit: Option<&Path>) -> PrepResult<Self> {
    let config_path = match explicit {
      Some(path) if !path.is_file() => {
        return Err(ConfigError::NotFound { path: path.to_path_buf() }.into());
      }
      Some(path) => Some(path.to_path_buf()),
      None => Self::find_config_path(dir),
    };

    let Some(config_path) = config_path else {
      tracing::debug!(dir = %dir.display(), "no release-prep.toml found, using defaults");
      return Ok(Self::default());
    };

    tracing::debug!(path = %config_path.display(), "loading configuration");
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> PrepResult<Self> {
    let config: PrepConfig = toml::from_str(content)?;
    config.tracker.validate()?;
    Ok(config)
  }

  /// Apply command line overrides, then re-validate
  pub fn with_overrides(mut self, overrides: ConfigOverrides) -> PrepResult<Self> {
    if let Some(url) = overrides.tracker_url {
      self.tracker.base_url = Some(url);
    }
    if let Some(project) = overrides.project {
      self.tracker.project = Some(project);
    }
    if let Some(lines) = overrides.header_lines {
      self.changelog.header_lines = lines;
    }
    self.tracker.validate()?;
    Ok(self)
  }
}

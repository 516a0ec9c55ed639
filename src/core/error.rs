//! Error types for release-prep with contextual messages and exit codes
//!
//! Every failure aborts the whole invocation. Errors are grouped by where they
//! come from (tracker, release validation, documents, git, config) so that the
//! CLI can print a targeted help line and pick an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-prep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Release validation failure (unknown, unreleased or malformed version)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-prep
#[derive(Debug)]
pub enum PrepError {
  /// Configuration errors
  Config(ConfigError),

  /// Issue tracker transport errors
  Tracker(TrackerError),

  /// Release record validation errors
  Release(ReleaseError),

  /// Readme / changelog mutation errors
  Document(DocumentError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PrepError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PrepError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PrepError::Message { message, context, help } => PrepError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      // stays an I/O error so the exit code does not change
      PrepError::Io(err) => PrepError::Io(io::Error::new(err.kind(), format!("{}: {}", ctx_str, err))),
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PrepError::Config(_) => ExitCode::User,
      PrepError::Document(_) => ExitCode::User,
      PrepError::Release(_) => ExitCode::Validation,
      PrepError::Tracker(_) => ExitCode::System,
      PrepError::Git(_) => ExitCode::System,
      PrepError::Io(_) => ExitCode::System,
      PrepError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PrepError::Config(e) => e.help_message(),
      PrepError::Tracker(e) => e.help_message(),
      PrepError::Release(e) => e.help_message(),
      PrepError::Document(e) => e.help_message(),
      PrepError::Git(e) => e.help_message(),
      PrepError::Message { help, .. } => help.clone(),
      PrepError::Io(_) => None,
    }
  }
}

impl fmt::Display for PrepError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PrepError::Config(e) => write!(f, "{}", e),
      PrepError::Tracker(e) => write!(f, "{}", e),
      PrepError::Release(e) => write!(f, "{}", e),
      PrepError::Document(e) => write!(f, "{}", e),
      PrepError::Git(e) => write!(f, "{}", e),
      PrepError::Io(e) => write!(f, "I/O error: {}", e),
      PrepError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PrepError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PrepError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PrepError {
  fn from(err: io::Error) -> Self {
    PrepError::Io(err)
  }
}

impl From<toml::de::Error> for PrepError {
  fn from(err: toml::de::Error) -> Self {
    PrepError::Config(ConfigError::Invalid {
      message: format!("TOML parse error: {}", err),
    })
  }
}

impl From<regex::Error> for PrepError {
  fn from(err: regex::Error) -> Self {
    PrepError::message(format!("Regex error: {}", err))
  }
}

impl From<tempfile::PersistError> for PrepError {
  fn from(err: tempfile::PersistError) -> Self {
    PrepError::Io(err.error)
  }
}

impl From<ConfigError> for PrepError {
  fn from(err: ConfigError) -> Self {
    PrepError::Config(err)
  }
}

impl From<TrackerError> for PrepError {
  fn from(err: TrackerError) -> Self {
    PrepError::Tracker(err)
  }
}

impl From<ReleaseError> for PrepError {
  fn from(err: ReleaseError) -> Self {
    PrepError::Release(err)
  }
}

impl From<DocumentError> for PrepError {
  fn from(err: DocumentError) -> Self {
    PrepError::Document(err)
  }
}

impl From<GitError> for PrepError {
  fn from(err: GitError) -> Self {
    PrepError::Git(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// Missing required field (neither in the config file nor on the command line)
  MissingField { field: String },

  /// Field present but unusable
  Invalid { message: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Pass an existing file to --config or drop the flag to use release-prep.toml.".to_string())
      }
      ConfigError::MissingField { field } => Some(format!(
        "Set `{}` in release-prep.toml or pass the matching command line flag.",
        field
      )),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Configuration file not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required configuration: {}", field)
      }
      ConfigError::Invalid { message } => {
        write!(f, "Invalid configuration: {}", message)
      }
    }
  }
}

/// Issue tracker transport errors
#[derive(Debug)]
pub enum TrackerError {
  /// Request could not be sent or the connection failed
  Request { url: String, message: String },

  /// Tracker answered with a non-success status
  Status { url: String, status: u16, body: String },

  /// Response body was not the expected JSON shape
  Decode { url: String, message: String },
}

impl TrackerError {
  fn help_message(&self) -> Option<String> {
    match self {
      TrackerError::Status { status: 401, .. } | TrackerError::Status { status: 403, .. } => Some(
        "Check tracker.username in release-prep.toml and the API token environment variable.".to_string(),
      ),
      TrackerError::Status { status: 404, .. } => {
        Some("Check tracker.base_url and tracker.project (or --tracker-url / --project).".to_string())
      }
      TrackerError::Request { .. } => Some("Check network connectivity and tracker.base_url.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for TrackerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrackerError::Request { url, message } => {
        write!(f, "Tracker request to {} failed: {}", url, message)
      }
      TrackerError::Status { url, status, body } => {
        write!(f, "Tracker returned HTTP {} for {}", status, url)?;
        if !body.is_empty() {
          write!(f, "\n{}", body)?;
        }
        Ok(())
      }
      TrackerError::Decode { url, message } => {
        write!(f, "Unexpected tracker response from {}: {}", url, message)
      }
    }
  }
}

/// Release record validation errors
#[derive(Debug, PartialEq, Eq)]
pub enum ReleaseError {
  /// No tracker version carries this name
  NotFound { version: String, candidates: Vec<String> },

  /// Version exists but is not marked released
  NotReleased { version: String },

  /// Version label has no `<major>.<minor>` family
  MalformedVersion { version: String },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::NotFound { candidates, .. } if !candidates.is_empty() => {
        Some(format!("Did you mean one of: {}?", candidates.join(", ")))
      }
      ReleaseError::NotFound { .. } => Some("Version names are matched exactly, including case.".to_string()),
      ReleaseError::NotReleased { .. } => {
        Some("Mark the version as released in the issue tracker, then run release-prep again.".to_string())
      }
      ReleaseError::MalformedVersion { .. } => {
        Some("Expected a label like 5.3.2.Final with numeric major and minor parts.".to_string())
      }
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::NotFound { version, .. } => {
        write!(f, "Version {} does not exist in the issue tracker", version)
      }
      ReleaseError::NotReleased { version } => {
        write!(f, "Version {} is not yet released in the issue tracker", version)
      }
      ReleaseError::MalformedVersion { version } => {
        write!(f, "Version {} has no <major>.<minor> version family", version)
      }
    }
  }
}

/// Readme / changelog mutation errors
#[derive(Debug)]
pub enum DocumentError {
  /// Target path missing or not a regular file
  FileNotFound { path: PathBuf },

  /// File is shorter than the header block that must be kept above the insertion point
  InsertionPointOutOfRange {
    path: PathBuf,
    lines: usize,
    required: usize,
  },
}

impl DocumentError {
  fn help_message(&self) -> Option<String> {
    match self {
      DocumentError::FileNotFound { .. } => None,
      DocumentError::InsertionPointOutOfRange { required, .. } => Some(format!(
        "The changelog must start with a {}-line header block (see [changelog] header_lines).",
        required
      )),
    }
  }
}

impl fmt::Display for DocumentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentError::FileNotFound { path } => {
        write!(f, "{} is not a valid file", path.display())
      }
      DocumentError::InsertionPointOutOfRange { path, lines, required } => {
        write!(
          f,
          "{} has {} line(s), cannot insert after line {}",
          path.display(),
          lines,
          required
        )
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "The file must live inside a git working tree: {}",
        path.display()
      )),
      GitError::CommandFailed { stderr, .. } if stderr.contains("Please tell me who you are") => {
        Some("Configure user.name and user.email for the repository.".to_string())
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for release-prep
pub type PrepResult<T> = Result<T, PrepError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PrepResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PrepResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PrepError>,
{
  fn context(self, ctx: impl Into<String>) -> PrepResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PrepResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PrepError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

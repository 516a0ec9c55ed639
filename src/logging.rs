use tracing_subscriber::{EnvFilter, fmt};

/// Initialize diagnostic logging on stderr
///
/// Uses the `RUST_LOG` environment variable if set, otherwise falls back
/// to `default_level` (e.g. "warn", "debug", "release_prep=debug").
/// Stdout stays reserved for the command's own output.
pub fn init_logging(default_level: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(true)
    .with_level(true)
    .try_init()
    .ok();

  tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialised");
}

//! Core building blocks shared by all commands
//!
//! - **config**: release-prep.toml parsing, defaults and command line overrides
//! - **context**: per-invocation context (config + as-of date)
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: commit gateway backed by system git

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;

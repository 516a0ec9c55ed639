//! CLI commands for release-prep
//!
//! - **prerelease**: resolve a released tracker version, then print the website
//!   release file and update/commit the readme and changelog as requested
//!
//! Commands take `&PrepContext` plus the tracker and commit gateway, so main.rs
//! decides which real implementations are wired in.

pub mod prerelease;

pub use prerelease::{PrereleaseOptions, run_prerelease};

//! Release artifacts derived from tracker data
//!
//! # Core Invariants
//!
//! 1. **Only released versions are processed**
//!    - The version must exist in the tracker under its exact name
//!    - It must be flagged as released there
//!
//! 2. **Issue order comes from the tracker**
//!    - Issues are queried ordered by issue type
//!    - The changelog merges adjacent equal types and never re-sorts
//!
//! # Architecture
//!
//! - **resolver**: version label → validated [`ReleaseRecord`](crate::tracker::ReleaseRecord)
//! - **changelog**: issues → grouped plain-text changelog block
//! - **website**: release record → website release file

pub mod changelog;
pub mod resolver;
pub mod website;

pub use changelog::ChangelogBlock;
pub use resolver::ReleaseResolver;
pub use website::WebsiteReleaseTemplate;

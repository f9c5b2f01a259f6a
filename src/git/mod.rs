//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2` or spawns the `git` binary; the rest of the crate reaches tags
//! through the [`crate::store::TagStore`] capability.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening (bare repositories included)
//! - Tag listing, resolution, creation and deletion
//! - Pushing and deleting tags on a remote
//! - Remote URL parsing
//!
//! # Invariants
//!
//! - Tag creation never overwrites an existing tag
//! - All operations return strong types (Oid)

mod interface;

pub use interface::{Git, GitError, RepoInfo, TAG_REF_PREFIX};

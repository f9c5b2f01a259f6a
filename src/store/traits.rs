//! store::traits
//!
//! TagStore trait definition.
//!
//! # Design
//!
//! Store calls are synchronous; the engine performs them strictly in
//! order. A single failing call is reported as a [`StoreError`] and it is
//! up to the caller whether that ends the run or is merely recorded.

use thiserror::Error;

use crate::core::types::Oid;

/// Errors from tag store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The tag does not exist.
    #[error("tag not found: {0}")]
    NotFound(String),

    /// Creation would overwrite an existing tag.
    #[error("tag already exists: {0}")]
    AlreadyExists(String),

    /// Any other failure of the underlying store or transport.
    #[error("{0}")]
    Backend(String),
}

/// Capability over a repository's tag namespace.
///
/// Names are bare tag names (`v1.0.0`), never full refs.
pub trait TagStore {
    /// List every local tag, sorted lexicographically.
    fn list_tags(&self) -> Result<Vec<String>, StoreError>;

    /// Resolve a tag to the commit it points at.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tag does not exist
    fn resolve(&self, name: &str) -> Result<Oid, StoreError>;

    /// Create a tag at `target`.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a tag with that name exists
    /// - `Backend` if the store refuses the name or the commit
    fn create_tag(&self, name: &str, target: &Oid) -> Result<(), StoreError>;

    /// Delete a local tag.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tag does not exist
    fn delete_local_tag(&self, name: &str) -> Result<(), StoreError>;

    /// Publish the local tag `name` on `remote`.
    fn push_ref(&self, remote: &str, name: &str) -> Result<(), StoreError>;

    /// Remove the tag `name` from `remote`.
    fn delete_remote_ref(&self, remote: &str, name: &str) -> Result<(), StoreError>;
}

//! forge::traits
//!
//! Forge trait definition for hosted release objects.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! Hosted releases are a side effect of tag deletion: the engine calls the
//! forge after a tag is gone and discards any failure. A forge error never
//! changes what happened to the tags.
//!
//! # Example
//!
//! ```ignore
//! use tagshift::forge::{Forge, ForgeError};
//!
//! async fn drop_release(forge: &dyn Forge, tag: &str) {
//!     if let Err(e) = forge.delete_release(tag).await {
//!         eprintln!("[debug] release cleanup for {} failed: {}", tag, e);
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A hosted release attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Forge-assigned release id
    pub id: u64,
    /// The tag the release is attached to
    pub tag_name: String,
    /// Display name, if set
    pub name: Option<String>,
}

/// A hosted release service keyed by tag name.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Look up the release attached to `tag`.
    ///
    /// Returns `Ok(None)` when the tag has no release.
    async fn find_release(&self, tag: &str) -> Result<Option<Release>, ForgeError>;

    /// Delete the release attached to `tag`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tag has no release
    /// - `AuthRequired` / `AuthFailed` if credentials are missing or rejected
    async fn delete_release(&self, tag: &str) -> Result<(), ForgeError>;
}

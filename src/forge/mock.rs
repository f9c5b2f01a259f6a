//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! Releases are stored in memory keyed by tag name. A failure can be
//! configured for every call, and each call is recorded so tests can
//! assert which tags the engine tried to clean up.
//!
//! # Example
//!
//! ```
//! use tagshift::forge::mock::MockForge;
//! use tagshift::forge::Forge;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let forge = MockForge::new().with_release("v1.0.0");
//!     forge.delete_release("v1.0.0").await.unwrap();
//!     assert!(forge.release_tags().is_empty());
//! });
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Forge, ForgeError, Release};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Stored releases by tag.
    releases: BTreeMap<String, Release>,
    /// Last assigned release id.
    last_id: u64,
    /// Error returned by every call, if set.
    fail_with: Option<ForgeError>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    FindRelease { tag: String },
    DeleteRelease { tag: String },
}

impl MockForge {
    /// Create a new mock forge without releases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a release for `tag`.
    pub fn with_release(self, tag: impl Into<String>) -> Self {
        {
            let mut inner = self.lock();
            inner.last_id += 1;
            let tag = tag.into();
            let release = Release {
                id: inner.last_id,
                tag_name: tag.clone(),
                name: Some(tag.clone()),
            };
            inner.releases.insert(tag, release);
        }
        self
    }

    /// Configure every call to fail with `error`.
    pub fn fail_with(self, error: ForgeError) -> Self {
        self.lock().fail_with = Some(error);
        self
    }

    /// Tags that still have a release, sorted.
    pub fn release_tags(&self) -> Vec<String> {
        self.lock().releases.keys().cloned().collect()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Tags passed to `delete_release`, in call order.
    pub fn deleted_tags(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::DeleteRelease { tag } => Some(tag),
                MockOperation::FindRelease { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn find_release(&self, tag: &str) -> Result<Option<Release>, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::FindRelease {
            tag: tag.to_string(),
        });
        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }
        Ok(inner.releases.get(tag).cloned())
    }

    async fn delete_release(&self, tag: &str) -> Result<(), ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::DeleteRelease {
            tag: tag.to_string(),
        });
        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }
        inner
            .releases
            .remove(tag)
            .map(|_| ())
            .ok_or_else(|| ForgeError::NotFound(format!("no release for tag {}", tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_existing_release() {
        let forge = MockForge::new().with_release("v1").with_release("v2");
        forge.delete_release("v1").await.unwrap();
        assert_eq!(forge.release_tags(), vec!["v2"]);
    }

    #[tokio::test]
    async fn delete_missing_release_is_not_found() {
        let forge = MockForge::new();
        let err = forge.delete_release("v1").await.unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn find_release_assigns_ids() {
        let forge = MockForge::new().with_release("v1").with_release("v2");
        let v2 = forge.find_release("v2").await.unwrap().unwrap();
        assert_eq!(v2.id, 2);
        assert_eq!(forge.find_release("v3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn fail_with_applies_to_all_calls() {
        let forge = MockForge::new()
            .with_release("v1")
            .fail_with(ForgeError::RateLimited);
        assert_eq!(
            forge.delete_release("v1").await,
            Err(ForgeError::RateLimited)
        );
        assert_eq!(forge.release_tags(), vec!["v1"]);
    }

    #[tokio::test]
    async fn operations_recorded() {
        let forge = MockForge::new();
        let _ = forge.find_release("v1").await;
        let _ = forge.delete_release("v2").await;
        assert_eq!(
            forge.operations(),
            vec![
                MockOperation::FindRelease {
                    tag: "v1".to_string()
                },
                MockOperation::DeleteRelease {
                    tag: "v2".to_string()
                },
            ]
        );
        assert_eq!(forge.deleted_tags(), vec!["v2"]);
    }

    #[test]
    fn forge_name() {
        assert_eq!(MockForge::new().name(), "mock");
    }
}

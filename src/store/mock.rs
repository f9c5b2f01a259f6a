//! store::mock
//!
//! In-memory tag store for deterministic testing.
//!
//! # Design
//!
//! The mock keeps a local tag map plus one tag map per named remote. It
//! follows the observable behavior of a real repository closely enough
//! for the engine's edge cases: creation never overwrites, deleting a
//! missing local tag fails, and pushing requires the tag to exist locally.
//! Deleting a ref a remote lacks succeeds, as over git's local transport;
//! use [`FailOn::DeleteRemoteRef`] to exercise a rejecting remote.
//! Failures can be injected per operation and every call is recorded.
//!
//! # Example
//!
//! ```
//! use tagshift::core::types::Oid;
//! use tagshift::store::mock::{FailOn, MockTagStore};
//! use tagshift::store::TagStore;
//!
//! let commit = Oid::new("1111111111111111111111111111111111111111").unwrap();
//! let store = MockTagStore::new()
//!     .with_tag("v1.0.0", commit.clone())
//!     .fail_on(FailOn::DeleteLocal("v1.0.0".to_string()));
//!
//! assert_eq!(store.resolve("v1.0.0").unwrap(), commit);
//! assert!(store.delete_local_tag("v1.0.0").is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{StoreError, TagStore};
use crate::core::types::Oid;

/// Mock tag store for testing.
///
/// Clones share state, so a test can keep a handle for inspection while
/// the engine borrows another.
#[derive(Debug, Clone, Default)]
pub struct MockTagStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug, Default)]
struct MockStoreInner {
    tags: BTreeMap<String, Oid>,
    remotes: BTreeMap<String, BTreeMap<String, Oid>>,
    fail_on: Vec<FailOn>,
    list_calls: usize,
    operations: Vec<StoreOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    /// Fail every `list_tags` call from the given zero-based call index on.
    ListTagsFrom(usize),
    /// Fail `resolve` for the named tag.
    Resolve(String),
    /// Fail `create_tag` for the named tag.
    CreateTag(String),
    /// Fail `delete_local_tag` for the named tag.
    DeleteLocal(String),
    /// Fail `push_ref` for the named tag.
    PushRef(String),
    /// Fail `delete_remote_ref` for the named tag.
    DeleteRemoteRef(String),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    ListTags,
    Resolve { name: String },
    CreateTag { name: String, target: Oid },
    DeleteLocalTag { name: String },
    PushRef { remote: String, name: String },
    DeleteRemoteRef { remote: String, name: String },
}

impl MockTagStore {
    /// Create an empty store with no remotes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a local tag.
    pub fn with_tag(self, name: impl Into<String>, target: Oid) -> Self {
        self.lock().tags.insert(name.into(), target);
        self
    }

    /// Add an empty remote.
    pub fn with_remote(self, remote: impl Into<String>) -> Self {
        self.lock().remotes.entry(remote.into()).or_default();
        self
    }

    /// Add a tag on a remote, creating the remote if needed.
    pub fn with_remote_tag(
        self,
        remote: impl Into<String>,
        name: impl Into<String>,
        target: Oid,
    ) -> Self {
        self.lock()
            .remotes
            .entry(remote.into())
            .or_default()
            .insert(name.into(), target);
        self
    }

    /// Configure an operation to fail. May be called repeatedly.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on.push(fail_on);
        self
    }

    /// Local tag names, sorted.
    pub fn tags(&self) -> Vec<String> {
        self.lock().tags.keys().cloned().collect()
    }

    /// The commit a local tag points at.
    pub fn tag(&self, name: &str) -> Option<Oid> {
        self.lock().tags.get(name).cloned()
    }

    /// Tag names on a remote, sorted. Empty if the remote is unknown.
    pub fn remote_tags(&self, remote: &str) -> Vec<String> {
        self.lock()
            .remotes
            .get(remote)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All recorded operations, oldest first.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.lock().operations.clone()
    }

    /// Recorded operations that changed local or remote state.
    pub fn mutations(&self) -> Vec<StoreOperation> {
        self.operations()
            .into_iter()
            .filter(|op| !matches!(op, StoreOperation::ListTags | StoreOperation::Resolve { .. }))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockStoreInner> {
        // A poisoned lock only means another test thread panicked; the data is still usable
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MockStoreInner {
    fn should_fail(&self, check: impl Fn(&FailOn) -> bool) -> bool {
        self.fail_on.iter().any(check)
    }

    fn remote_mut(&mut self, remote: &str) -> Result<&mut BTreeMap<String, Oid>, StoreError> {
        self.remotes.get_mut(remote).ok_or_else(|| {
            StoreError::Backend(format!("'{}' does not appear to be a git repository", remote))
        })
    }
}

fn injected(op: &str, name: &str) -> StoreError {
    StoreError::Backend(format!("injected failure: {} {}", op, name))
}

impl TagStore for MockTagStore {
    fn list_tags(&self) -> Result<Vec<String>, StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::ListTags);
        let call = inner.list_calls;
        inner.list_calls += 1;

        if inner.should_fail(|f| matches!(f, FailOn::ListTagsFrom(from) if call >= *from)) {
            return Err(StoreError::Backend("injected failure: list tags".to_string()));
        }
        Ok(inner.tags.keys().cloned().collect())
    }

    fn resolve(&self, name: &str) -> Result<Oid, StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::Resolve {
            name: name.to_string(),
        });

        if inner.should_fail(|f| matches!(f, FailOn::Resolve(n) if n == name)) {
            return Err(injected("resolve", name));
        }
        inner
            .tags
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn create_tag(&self, name: &str, target: &Oid) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::CreateTag {
            name: name.to_string(),
            target: target.clone(),
        });

        if inner.should_fail(|f| matches!(f, FailOn::CreateTag(n) if n == name)) {
            return Err(injected("create tag", name));
        }
        if inner.tags.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        inner.tags.insert(name.to_string(), target.clone());
        Ok(())
    }

    fn delete_local_tag(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::DeleteLocalTag {
            name: name.to_string(),
        });

        if inner.should_fail(|f| matches!(f, FailOn::DeleteLocal(n) if n == name)) {
            return Err(injected("delete local tag", name));
        }
        inner
            .tags
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn push_ref(&self, remote: &str, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::PushRef {
            remote: remote.to_string(),
            name: name.to_string(),
        });

        if inner.should_fail(|f| matches!(f, FailOn::PushRef(n) if n == name)) {
            return Err(injected("push", name));
        }
        let target = inner.tags.get(name).cloned().ok_or_else(|| {
            StoreError::Backend(format!("src refspec refs/tags/{} does not match any", name))
        })?;

        let remote_tags = inner.remote_mut(remote)?;
        match remote_tags.get(name) {
            Some(existing) if *existing != target => Err(StoreError::Backend(format!(
                "! [rejected] {} -> {} (already exists)",
                name, name
            ))),
            _ => {
                remote_tags.insert(name.to_string(), target);
                Ok(())
            }
        }
    }

    fn delete_remote_ref(&self, remote: &str, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOperation::DeleteRemoteRef {
            remote: remote.to_string(),
            name: name.to_string(),
        });

        if inner.should_fail(|f| matches!(f, FailOn::DeleteRemoteRef(n) if n == name)) {
            return Err(injected("delete remote tag", name));
        }
        // Like a push over the local transport, deleting a ref the remote
        // lacks is a no-op
        inner.remote_mut(remote)?.remove(name);
        Ok(())
    }
}

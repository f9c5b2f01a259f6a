//! store::git
//!
//! [`TagStore`] for a real repository.

use super::traits::{StoreError, TagStore};
use crate::core::types::Oid;
use crate::git::{Git, GitError};

impl From<GitError> for StoreError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::RefNotFound { refname } => StoreError::NotFound(strip_tag_prefix(refname)),
            GitError::RefExists { refname } => StoreError::AlreadyExists(strip_tag_prefix(refname)),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

fn strip_tag_prefix(refname: String) -> String {
    match refname.strip_prefix(crate::git::TAG_REF_PREFIX) {
        Some(name) => name.to_string(),
        None => refname,
    }
}

impl TagStore for Git {
    fn list_tags(&self) -> Result<Vec<String>, StoreError> {
        Ok(Git::list_tags(self)?)
    }

    fn resolve(&self, name: &str) -> Result<Oid, StoreError> {
        Ok(self.resolve_tag(name)?)
    }

    fn create_tag(&self, name: &str, target: &Oid) -> Result<(), StoreError> {
        Ok(Git::create_tag(self, name, target)?)
    }

    fn delete_local_tag(&self, name: &str) -> Result<(), StoreError> {
        Ok(self.delete_tag(name)?)
    }

    fn push_ref(&self, remote: &str, name: &str) -> Result<(), StoreError> {
        Ok(self.push_tag(remote, name)?)
    }

    fn delete_remote_ref(&self, remote: &str, name: &str) -> Result<(), StoreError> {
        Ok(self.delete_remote_tag(remote, name)?)
    }
}

//! engine::exec
//!
//! The migration executor.
//!
//! # Executor Contract
//!
//! A run has two strictly ordered phases:
//!
//! 1. **Rename**: every legacy tag of the initial plan is recreated under
//!    the new scheme at the same commit, then removed.
//! 2. **Delete**: every remaining tag that classifies as `Delete` is
//!    removed, unless this run created it.
//!
//! The store has no transactions. Instead the executor re-reads the tag
//! list at each checkpoint (before every rename, and once before the
//! delete phase) and never trusts a list read before a mutation.
//!
//! # Invariants
//!
//! - A tag created by the rename phase is never deleted in the same run
//! - A failing store call is recorded in [`ExecuteResult::errors`] and the
//!   run continues
//! - A rename target that exists at a different commit is left alone for
//!   the whole run, as is its source
//! - Hosted-release cleanup never affects the result
//!
//! # Example
//!
//! ```ignore
//! use tagshift::engine::exec::Executor;
//!
//! let executor = Executor::new(&git, scheme).with_forge(forge.as_ref());
//! let result = executor.execute(Some("origin")).await?;
//! for line in result.renamed_tags() {
//!     println!("  ~ {}", line);
//! }
//! ```

use std::collections::BTreeSet;

use super::plan::plan;
use crate::core::naming::{Classification, NamingScheme};
use crate::core::report::{ExecuteResult, RenameEntry, RenameOutcome, RunFailure};
use crate::core::types::Oid;
use crate::forge::Forge;
use crate::store::{StoreError, TagStore};
use crate::ui::output::{self, Verbosity};

/// Tags the delete phase must leave alone.
#[derive(Debug, Default)]
struct Keep {
    /// Created by this run's rename phase.
    protected: BTreeSet<String>,
    /// Existing rename targets not proven to match their legacy tag.
    conflicted: BTreeSet<String>,
}

impl Keep {
    fn reason(&self, tag: &str) -> Option<&'static str> {
        if self.protected.contains(tag) {
            Some("created by this run")
        } else if self.conflicted.contains(tag) {
            Some("unresolved conflict with a legacy tag")
        } else {
            None
        }
    }
}

/// Runs a migration against a tag store.
pub struct Executor<'a> {
    store: &'a dyn TagStore,
    scheme: NamingScheme,
    forge: Option<&'a dyn Forge>,
    verbosity: Verbosity,
}

impl<'a> Executor<'a> {
    /// Create an executor without hosted-release cleanup.
    pub fn new(store: &'a dyn TagStore, scheme: NamingScheme) -> Self {
        Self {
            store,
            scheme,
            forge: None,
            verbosity: Verbosity::Normal,
        }
    }

    /// Delete hosted releases of deleted tags through `forge`.
    ///
    /// Only takes effect for runs that also mirror a remote.
    pub fn with_forge(mut self, forge: &'a dyn Forge) -> Self {
        self.forge = Some(forge);
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Run the migration.
    ///
    /// With `remote` set, every local rename and deletion is mirrored onto
    /// that remote.
    ///
    /// # Errors
    ///
    /// Only a failure to read the initial tag list is returned; nothing has
    /// been changed at that point. Every later failure is recorded in the
    /// result instead.
    pub async fn execute(&self, remote: Option<&str>) -> Result<ExecuteResult, StoreError> {
        let plan = plan(self.store, &self.scheme)?;
        self.debug(format!(
            "plan: {} rename(s), {} deletion(s)",
            plan.to_rename.len(),
            plan.to_delete.len()
        ));

        let mut result = ExecuteResult::default();
        let mut keep = Keep::default();

        for entry in &plan.to_rename {
            self.rename(entry, remote, &mut keep, &mut result);
        }

        self.delete_remaining(remote, &keep, &mut result).await;

        Ok(result)
    }

    // =========================================================================
    // Phase 1: rename
    // =========================================================================

    fn rename(
        &self,
        entry: &RenameEntry,
        remote: Option<&str>,
        keep: &mut Keep,
        result: &mut ExecuteResult,
    ) {
        let current = match self.store.list_tags() {
            Ok(tags) => tags,
            Err(e) => {
                result.errors.push(RunFailure::ListTags {
                    checkpoint: format!("renaming {}", entry.old_name),
                    reason: e.to_string(),
                });
                return;
            }
        };

        if current.contains(&entry.new_name) {
            self.resolve_conflict(entry, remote, keep, result);
            return;
        }

        let Some(commit) = self.resolve(&entry.old_name, result) else {
            return;
        };

        if let Err(e) = self.store.create_tag(&entry.new_name, &commit) {
            result.errors.push(RunFailure::CreateTag {
                name: entry.new_name.clone(),
                reason: e.to_string(),
            });
            return;
        }
        self.debug(format!(
            "created {} at {}",
            entry.new_name,
            commit.short(8)
        ));

        if let Some(remote) = remote {
            // A failed push is recorded but the old tag is still removed
            match self.store.push_ref(remote, &entry.new_name) {
                Ok(()) => self.debug(format!("pushed {} to {}", entry.new_name, remote)),
                Err(e) => result.errors.push(RunFailure::PushTag {
                    name: entry.new_name.clone(),
                    remote: remote.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        self.delete_local(&entry.old_name, result);
        if let Some(remote) = remote {
            self.delete_remote(remote, &entry.old_name, result);
        }

        keep.protected.insert(entry.new_name.clone());
        result.renamed.push(RenameOutcome {
            old_name: entry.old_name.clone(),
            new_name: entry.new_name.clone(),
            conflict_resolved: false,
        });
    }

    /// The rename target already exists.
    fn resolve_conflict(
        &self,
        entry: &RenameEntry,
        remote: Option<&str>,
        keep: &mut Keep,
        result: &mut ExecuteResult,
    ) {
        // Held until the commits are known to match
        keep.conflicted.insert(entry.new_name.clone());

        let Some(old_commit) = self.resolve(&entry.old_name, result) else {
            return;
        };
        let Some(existing_commit) = self.resolve(&entry.new_name, result) else {
            return;
        };

        if old_commit != existing_commit {
            result.errors.push(RunFailure::Conflict {
                old_name: entry.old_name.clone(),
                new_name: entry.new_name.clone(),
                old_commit,
                existing_commit,
            });
            return;
        }

        self.debug(format!(
            "{} already exists at {}, dropping {}",
            entry.new_name,
            existing_commit.short(8),
            entry.old_name
        ));

        self.delete_local(&entry.old_name, result);
        if let Some(remote) = remote {
            self.delete_remote(remote, &entry.old_name, result);
        }

        keep.conflicted.remove(&entry.new_name);
        keep.protected.insert(entry.new_name.clone());
        result.renamed.push(RenameOutcome {
            old_name: entry.old_name.clone(),
            new_name: entry.new_name.clone(),
            conflict_resolved: true,
        });
    }

    // =========================================================================
    // Phase 2: delete
    // =========================================================================

    async fn delete_remaining(
        &self,
        remote: Option<&str>,
        keep: &Keep,
        result: &mut ExecuteResult,
    ) {
        let current = match self.store.list_tags() {
            Ok(tags) => tags,
            Err(e) => {
                result.errors.push(RunFailure::ListTags {
                    checkpoint: "delete phase".to_string(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        for tag in current {
            if let Some(reason) = keep.reason(&tag) {
                self.debug(format!("keeping {}: {}", tag, reason));
                continue;
            }
            if self.scheme.classify(&tag) != Classification::Delete {
                continue;
            }
            if !self.delete_local(&tag, result) {
                continue;
            }

            if let Some(remote) = remote {
                self.delete_remote(remote, &tag, result);
                if let Some(forge) = self.forge {
                    self.delete_release(forge, &tag).await;
                }
            }

            result.deleted.push(tag);
        }
    }

    async fn delete_release(&self, forge: &dyn Forge, tag: &str) {
        match forge.delete_release(tag).await {
            Ok(()) => self.debug(format!("deleted {} release for {}", forge.name(), tag)),
            Err(e) => self.debug(format!(
                "no {} release removed for {}: {}",
                forge.name(),
                tag,
                e
            )),
        }
    }

    // =========================================================================
    // Store helpers
    // =========================================================================

    fn resolve(&self, name: &str, result: &mut ExecuteResult) -> Option<Oid> {
        match self.store.resolve(name) {
            Ok(oid) => Some(oid),
            Err(e) => {
                result.errors.push(RunFailure::Resolve {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn delete_local(&self, name: &str, result: &mut ExecuteResult) -> bool {
        match self.store.delete_local_tag(name) {
            Ok(()) => {
                self.debug(format!("deleted local tag {}", name));
                true
            }
            Err(e) => {
                result.errors.push(RunFailure::DeleteLocal {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn delete_remote(&self, remote: &str, name: &str, result: &mut ExecuteResult) {
        match self.store.delete_remote_ref(remote, name) {
            Ok(()) => self.debug(format!("deleted {} on {}", name, remote)),
            Err(e) => result.errors.push(RunFailure::DeleteRemote {
                name: name.to_string(),
                remote: remote.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn debug(&self, message: impl std::fmt::Display) {
        output::debug(message, self.verbosity);
    }
}

//! core::report
//!
//! Typed records produced by audit, plan, and execute.
//!
//! Every layer hands these fixed-field records to the next one; nothing is
//! passed around as loosely shaped maps. All of them serialize for `--json`.

use serde::Serialize;
use thiserror::Error;

use super::naming::Classification;
use super::types::Oid;

/// A tag together with how the current scheme classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedTag {
    pub name: String,
    pub classification: Classification,
}

/// A planned rename: `old_name` is recreated as `new_name` at the same commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub old_name: String,
    pub new_name: String,
}

/// Result of an audit: every tag, in listing order, with its classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub tags: Vec<ClassifiedTag>,
}

impl AuditReport {
    pub fn total(&self) -> usize {
        self.tags.len()
    }

    pub fn rename_count(&self) -> usize {
        self.count(Classification::Rename)
    }

    pub fn delete_count(&self) -> usize {
        self.count(Classification::Delete)
    }

    fn count(&self, classification: Classification) -> usize {
        self.tags
            .iter()
            .filter(|t| t.classification == classification)
            .count()
    }
}

/// What an execute run would change.
///
/// `to_rename` and `to_delete` partition the tag set the plan was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupPlan {
    pub to_rename: Vec<RenameEntry>,
    pub to_delete: Vec<ClassifiedTag>,
}

impl CleanupPlan {
    pub fn is_empty(&self) -> bool {
        self.to_rename.is_empty() && self.to_delete.is_empty()
    }
}

/// A rename that took effect during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    pub old_name: String,
    pub new_name: String,
    /// The target already existed at the same commit; only the old tag was removed.
    pub conflict_resolved: bool,
}

impl std::fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.old_name, self.new_name)?;
        if self.conflict_resolved {
            write!(f, " (conflict resolved)")?;
        }
        Ok(())
    }
}

/// A single operation that failed during a run.
///
/// These are recorded, never raised: the run continues past every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// Rename target exists at a different commit; neither tag was touched.
    #[error(
        "Conflict: {old_name} and {new_name} point to different commits. \
         Old: {}, existing: {}. Skipped.",
        .old_commit.short(8),
        .existing_commit.short(8)
    )]
    Conflict {
        old_name: String,
        new_name: String,
        old_commit: Oid,
        existing_commit: Oid,
    },

    #[error("Failed to list tags before {checkpoint}: {reason}")]
    ListTags { checkpoint: String, reason: String },

    #[error("Failed to resolve tag {name}: {reason}")]
    Resolve { name: String, reason: String },

    #[error("Failed to create tag {name}: {reason}")]
    CreateTag { name: String, reason: String },

    #[error("Failed to push tag {name} to remote {remote}: {reason}")]
    PushTag {
        name: String,
        remote: String,
        reason: String,
    },

    #[error("Failed to delete local tag {name}: {reason}")]
    DeleteLocal { name: String, reason: String },

    #[error("Failed to delete remote tag {name} on {remote}: {reason}")]
    DeleteRemote {
        name: String,
        remote: String,
        reason: String,
    },
}

/// Result of an execute run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecuteResult {
    pub renamed: Vec<RenameOutcome>,
    pub deleted: Vec<String>,
    pub errors: Vec<RunFailure>,
}

impl ExecuteResult {
    pub fn renamed_count(&self) -> usize {
        self.renamed.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Human-readable descriptions of each rename.
    pub fn renamed_tags(&self) -> Vec<String> {
        self.renamed.iter().map(ToString::to_string).collect()
    }

    /// Human-readable descriptions of each failure.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Whether the run completed without recording any failure.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

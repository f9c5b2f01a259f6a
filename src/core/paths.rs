//! core::paths
//!
//! Centralized path routing for tagshift storage locations.
//!
//! # Storage Layout
//!
//! All tagshift data is stored under `<common_dir>/tagshift/`:
//! - `config.toml` - Repository configuration
//! - `lock` - Exclusive lock file held for the duration of `execute`
//!
//! Repo-scoped storage uses `common_dir` so linked worktrees of the same
//! repository share one config and one lock, just as they share one tag
//! namespace.
//!
//! # Example
//!
//! ```
//! use tagshift::core::paths::TagshiftPaths;
//! use std::path::PathBuf;
//!
//! let paths = TagshiftPaths::new(PathBuf::from("/repo/.git"));
//!
//! assert_eq!(
//!     paths.repo_config_path(),
//!     PathBuf::from("/repo/.git/tagshift/config.toml")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::git::RepoInfo;

/// Path routing for tagshift's per-repository files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagshiftPaths {
    /// Path to the shared git directory (refs, objects, config).
    pub common_dir: PathBuf,
}

impl TagshiftPaths {
    pub fn new(common_dir: PathBuf) -> Self {
        Self { common_dir }
    }

    /// Create paths from an opened repository.
    ///
    /// ```ignore
    /// let git = Git::open(Path::new("."))?;
    /// let paths = TagshiftPaths::from_repo_info(&git.info());
    /// ```
    pub fn from_repo_info(info: &RepoInfo) -> Self {
        Self::new(info.common_dir.clone())
    }

    /// Root tagshift directory under common_dir.
    pub fn repo_tagshift_dir(&self) -> PathBuf {
        self.common_dir.join("tagshift")
    }

    /// This is `<common_dir>/tagshift/config.toml`.
    pub fn repo_config_path(&self) -> PathBuf {
        self.repo_tagshift_dir().join("config.toml")
    }

    /// This is `<common_dir>/tagshift/lock`.
    pub fn repo_lock_path(&self) -> PathBuf {
        self.repo_tagshift_dir().join("lock")
    }

    pub fn common_dir(&self) -> &Path {
        &self.common_dir
    }
}

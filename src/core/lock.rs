//! core::lock
//!
//! Exclusive repository lock for migration runs.
//!
//! A run re-reads the tag list at fixed checkpoints and trusts that nothing
//! else mutates the namespace in between. The lock keeps a second tagshift
//! process from interleaving its own mutations with ours. It does not stop
//! plain `git tag` invocations.
//!
//! # Storage
//!
//! - `<common_dir>/tagshift/lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - Lock is held for the entire execute run
//! - Lock is released on drop
//! - Acquisition is non-blocking (fails fast if locked)

use std::fs::{self, File, OpenOptions};

use fs2::FileExt;
use thiserror::Error;

use super::paths::TagshiftPaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("repository is locked by another tagshift process")]
    AlreadyLocked,

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on the repository's tag namespace.
///
/// ```ignore
/// let lock = RepoLock::acquire(&paths)?;
/// let result = executor.execute(remote).await?;
/// drop(lock);
/// ```
#[derive(Debug)]
pub struct RepoLock {
    /// Open lock file; the OS lock lives as long as this handle.
    file: File,
}

impl RepoLock {
    /// Attempt to acquire the repository lock.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &TagshiftPaths) -> Result<Self, LockError> {
        let dir = paths.repo_tagshift_dir();
        fs::create_dir_all(&dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let path = paths.repo_lock_path();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Self { file }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_paths(dir: &Path) -> TagshiftPaths {
        TagshiftPaths::new(dir.to_path_buf())
    }

    #[test]
    fn lock_acquire_creates_directory() {
        let temp = TempDir::new().unwrap();
        let paths = test_paths(temp.path());
        assert!(!paths.repo_tagshift_dir().exists());

        let _lock = RepoLock::acquire(&paths).expect("acquire lock");
        assert!(paths.repo_tagshift_dir().exists());
        assert!(paths.repo_lock_path().is_file());
    }

    #[test]
    fn lock_prevents_second_acquire() {
        let temp = TempDir::new().unwrap();
        let paths = test_paths(temp.path());

        let _lock = RepoLock::acquire(&paths).expect("first acquire");
        let result = RepoLock::acquire(&paths);
        assert!(matches!(result, Err(LockError::AlreadyLocked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = TempDir::new().unwrap();
        let paths = test_paths(temp.path());

        {
            let _lock = RepoLock::acquire(&paths).expect("first acquire");
        }

        RepoLock::acquire(&paths).expect("second acquire");
    }
}

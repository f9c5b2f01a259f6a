//! git::interface
//!
//! Git interface implementation using git2 and the git CLI.
//!
//! This module is the **single doorway** to every Git operation in
//! tagshift. Local reads and ref mutations go through `git2`; transport
//! (push, ls-remote) goes through the `git` binary so the user's
//! credential helpers and SSH configuration apply unchanged.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::RefExists`]: Ref creation would overwrite an existing ref
//! - [`GitError::CommandFailed`]: A `git` subprocess exited unsuccessfully
//!
//! # Example
//!
//! ```ignore
//! use tagshift::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for tag in git.list_tags()? {
//!     println!("{} -> {}", tag, git.resolve_tag(&tag)?.short(8));
//! }
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::core::types::{Oid, TypeError};

/// Prefix of every tag ref.
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Upper bound on a single `git` subprocess (push, ls-remote).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Ref already exists and creation does not overwrite.
    #[error("ref already exists: {refname}")]
    RefExists {
        /// The ref that already exists
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// A `git` subprocess failed to start or exited non-zero.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line, for display
        command: String,
        /// Trimmed standard error of the process
        stderr: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::Exists => GitError::RefExists {
                refname: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidRefName {
                message: format!("{}: {}", context, err.message()),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to the repository's own git directory
    pub git_dir: PathBuf,
    /// Path to the git directory shared by all worktrees
    pub common_dir: PathBuf,
    /// Path to the working directory, `None` for bare repositories
    pub work_dir: Option<PathBuf>,
}

/// The Git interface.
///
/// Bare repositories are accepted: a release mirror often is one, and
/// tags do not need a working tree.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Deadline for each `git` subprocess
    command_timeout: Duration,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            repo,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        })
    }

    /// Replace the deadline applied to each `git` subprocess.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Get repository information.
    pub fn info(&self) -> RepoInfo {
        RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            common_dir: self.repo.commondir().to_path_buf(),
            work_dir: self.repo.workdir().map(Path::to_path_buf),
        }
    }

    // =========================================================================
    // Tag Queries
    // =========================================================================

    /// List all local tag names, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidRefName`] if a tag name is not valid UTF-8.
    ///   Such a tag could be neither renamed nor deleted by name.
    pub fn list_tags(&self) -> Result<Vec<String>, GitError> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| GitError::from_git2(e, TAG_REF_PREFIX))?;

        let mut tags = Vec::with_capacity(names.len());
        for bytes in names.iter_bytes() {
            let name = std::str::from_utf8(bytes).map_err(|_| GitError::InvalidRefName {
                message: format!(
                    "tag name is not valid UTF-8: {}",
                    String::from_utf8_lossy(bytes)
                ),
            })?;
            tags.push(name.to_string());
        }
        tags.sort();
        Ok(tags)
    }

    /// Resolve a tag to the commit it points at.
    ///
    /// Annotated tags are peeled to their target commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the tag doesn't exist
    pub fn resolve_tag(&self, name: &str) -> Result<Oid, GitError> {
        self.resolve_ref(&tag_ref(name))
    }

    /// Resolve a ref to its commit OID.
    ///
    /// This peels through symbolic refs and tags to get the commit OID.
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;

        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname))?
            .id();

        Oid::new(oid.to_string()).map_err(|e| e.into())
    }

    /// Check if a tag exists.
    pub fn tag_exists(&self, name: &str) -> bool {
        self.repo.find_reference(&tag_ref(name)).is_ok()
    }

    // =========================================================================
    // Tag Mutation
    // =========================================================================

    /// Create a lightweight tag pointing at `target`.
    ///
    /// Never overwrites: an existing tag of the same name is an error.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefExists`] if the tag already exists
    /// - [`GitError::InvalidRefName`] if `name` is not a valid tag name
    /// - [`GitError::ObjectNotFound`] if `target` is not a commit in this repository
    pub fn create_tag(&self, name: &str, target: &Oid) -> Result<(), GitError> {
        let refname = tag_ref(name);
        if !git2::Reference::is_valid_name(&refname) {
            return Err(GitError::InvalidRefName {
                message: format!("'{}' is not a valid tag name", name),
            });
        }

        let git_oid = git2::Oid::from_str(target.as_str()).map_err(|_| GitError::InvalidOid {
            oid: target.to_string(),
        })?;
        let commit = self
            .repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;

        self.repo
            .reference(
                &refname,
                commit.id(),
                false,
                &format!("tagshift: create {}", name),
            )
            .map_err(|e| GitError::from_git2(e, &refname))?;

        Ok(())
    }

    /// Delete a local tag.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the tag doesn't exist
    pub fn delete_tag(&self, name: &str) -> Result<(), GitError> {
        let refname = tag_ref(name);
        let mut reference = self
            .repo
            .find_reference(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        reference
            .delete()
            .map_err(|e| GitError::from_git2(e, &refname))?;

        Ok(())
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Push a local tag to `remote` under the same name.
    pub fn push_tag(&self, remote: &str, name: &str) -> Result<(), GitError> {
        self.run_git(&["push", remote, &tag_ref(name)])?;
        Ok(())
    }

    /// Delete a tag on `remote`.
    ///
    /// # Errors
    ///
    /// - [`GitError::CommandFailed`] if the remote rejects the deletion.
    ///   A tag the remote lacks is rejected by some transports and
    ///   silently accepted by others.
    pub fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<(), GitError> {
        self.run_git(&["push", remote, &format!(":{}", tag_ref(name))])?;
        Ok(())
    }

    /// List the tag names published on `remote`, sorted.
    pub fn list_remote_tags(&self, remote: &str) -> Result<Vec<String>, GitError> {
        let stdout = self.run_git(&["ls-remote", "--tags", remote])?;
        Ok(parse_ls_remote_tags(&stdout))
    }

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: e.message().to_string(),
            }),
        }
    }

    /// Build a `git` invocation against this repository.
    ///
    /// Credential prompts are disabled: with no terminal to answer them a
    /// prompting push would only run into the deadline.
    fn git_command(&self, args: &[&str]) -> Command {
        let cwd = self.repo.workdir().unwrap_or_else(|| self.repo.path());
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run the git binary against this repository and return its stdout.
    ///
    /// The process is killed once `command_timeout` has passed.
    fn run_git(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        let failed = |stderr: String| GitError::CommandFailed {
            command: command.clone(),
            stderr,
        };

        let mut child = self
            .git_command(args)
            .spawn()
            .map_err(|e| failed(e.to_string()))?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.command_timeout;
        let status = loop {
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(failed(format!(
                    "timed out after {}s",
                    self.command_timeout.as_secs_f64()
                )));
            }
            match child.try_wait().map_err(|e| failed(e.to_string()))? {
                Some(status) => break status,
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            return Err(failed(String::from_utf8_lossy(&stderr).trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Read a child's pipe to the end on its own thread so a full pipe never
/// blocks the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn tag_ref(name: &str) -> String {
    format!("{}{}", TAG_REF_PREFIX, name)
}

/// Extract tag names from `git ls-remote --tags` output.
///
/// Peeled entries (`refs/tags/x^{}`) duplicate their annotated tag and are
/// dropped.
fn parse_ls_remote_tags(output: &str) -> Vec<String> {
    let mut tags: Vec<String> = output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter_map(|(_, refname)| refname.trim().strip_prefix(TAG_REF_PREFIX))
        .filter(|name| !name.ends_with("^{}"))
        .map(String::from)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

//! Integration tests against real repositories.
//!
//! Each test builds a temporary repository with the git binary, points the
//! engine at it through [`Git`], and checks the resulting tags with git
//! itself. Remote tests use a bare repository as "origin".

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use tagshift::core::naming::NamingScheme;
use tagshift::core::types::Oid;
use tagshift::engine::{audit, plan, Executor};
use tagshift::git::{Git, GitError};
use tagshift::store::{StoreError, TagStore};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A working repository with two commits, plus an optional bare origin.
struct TestRepo {
    dir: TempDir,
    origin: Option<PathBuf>,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let work = dir.path().join("work");
        std::fs::create_dir(&work).unwrap();

        run_git(&work, &["init", "-b", "main"]);
        run_git(&work, &["config", "user.email", "test@example.com"]);
        run_git(&work, &["config", "user.name", "Test User"]);

        std::fs::write(work.join("README.md"), "# Test Repo\n").unwrap();
        run_git(&work, &["add", "README.md"]);
        run_git(&work, &["commit", "-m", "Initial commit"]);
        std::fs::write(work.join("CHANGELOG.md"), "## 1.0\n").unwrap();
        run_git(&work, &["add", "CHANGELOG.md"]);
        run_git(&work, &["commit", "-m", "Second commit"]);

        Self { dir, origin: None }
    }

    /// Add a bare repository as "origin".
    fn with_origin(mut self) -> Self {
        let origin = self.dir.path().join("origin.git");
        run_git(self.dir.path(), &["init", "--bare", "origin.git"]);
        run_git(
            &self.path(),
            &["remote", "add", "origin", origin.to_str().unwrap()],
        );
        run_git(&self.path(), &["push", "-q", "origin", "main"]);
        self.origin = Some(origin);
        self
    }

    fn path(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    fn git(&self) -> Git {
        Git::open(&self.path()).expect("failed to open test repo")
    }

    fn rev(&self, rev: &str) -> Oid {
        Oid::new(git_stdout(&self.path(), &["rev-parse", rev])).unwrap()
    }

    fn tag(&self, name: &str, rev: &str) {
        run_git(&self.path(), &["tag", name, rev]);
    }

    fn annotated_tag(&self, name: &str, rev: &str) {
        run_git(&self.path(), &["tag", "-a", name, "-m", name, rev]);
    }

    fn push_tags(&self) {
        run_git(&self.path(), &["push", "-q", "origin", "--tags"]);
    }

    /// Tag names as git itself lists them.
    fn git_tags(&self) -> Vec<String> {
        lines(&git_stdout(&self.path(), &["tag", "--list"]))
    }

    /// Tag names in the bare origin.
    fn origin_tags(&self) -> Vec<String> {
        let origin = self.origin.as_ref().expect("no origin configured");
        lines(&git_stdout(origin, &["tag", "--list"]))
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn lines(text: &str) -> Vec<String> {
    let mut names: Vec<String> = text
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    names.sort();
    names
}

/// The ten-tag repository: two legacy tags and eight tags to drop.
fn ten_tag_repo(repo: &TestRepo) {
    repo.tag("nWave_v1.1.20", "HEAD~1");
    repo.tag("nWave_v1.1.21", "HEAD");
    for patch in 0..=6 {
        repo.tag(&format!("v2.17.{}", patch), "HEAD~1");
    }
    repo.tag("v1.4.8", "HEAD~1");
}

// =============================================================================
// Git interface
// =============================================================================

mod interface {
    use super::*;

    #[test]
    fn open_outside_repo_fails() {
        let dir = TempDir::new().unwrap();
        let err = Git::open(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::NotARepo { .. }));
    }

    #[test]
    fn open_from_subdirectory() {
        let repo = TestRepo::new();
        let sub = repo.path().join("nested/dir");
        std::fs::create_dir_all(&sub).unwrap();
        let git = Git::open(&sub).unwrap();
        assert_eq!(
            git.info().work_dir.unwrap().canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn open_bare_repository() {
        let repo = TestRepo::new().with_origin();
        let git = Git::open(repo.origin.as_ref().unwrap()).unwrap();
        assert!(git.info().work_dir.is_none());
        assert!(git.list_tags().unwrap().is_empty());
    }

    #[test]
    fn list_tags_sorted() {
        let repo = TestRepo::new();
        repo.tag("v2", "HEAD");
        repo.tag("nWave_v1", "HEAD");
        repo.tag("v10", "HEAD");
        assert_eq!(repo.git().list_tags().unwrap(), vec!["nWave_v1", "v10", "v2"]);
    }

    #[cfg(unix)]
    #[test]
    fn list_tags_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let repo = TestRepo::new();
        repo.tag("v1.0.0", "HEAD");
        let status = Command::new("git")
            .arg("update-ref")
            .arg(OsStr::from_bytes(b"refs/tags/v\xff"))
            .arg("HEAD")
            .current_dir(repo.path())
            .status()
            .expect("failed to run git");
        assert!(status.success());

        let err = repo.git().list_tags().unwrap_err();
        assert!(matches!(err, GitError::InvalidRefName { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn resolve_peels_annotated_tags() {
        let repo = TestRepo::new();
        repo.annotated_tag("nWave_v1.0.0", "HEAD~1");
        assert_eq!(
            repo.git().resolve_tag("nWave_v1.0.0").unwrap(),
            repo.rev("HEAD~1")
        );
    }

    #[test]
    fn resolve_missing_tag() {
        let repo = TestRepo::new();
        let err = repo.git().resolve_tag("v9.9.9").unwrap_err();
        assert!(matches!(err, GitError::RefNotFound { .. }));
    }

    #[test]
    fn create_tag_is_lightweight_and_never_overwrites() {
        let repo = TestRepo::new();
        let git = repo.git();
        let head = repo.rev("HEAD");

        git.create_tag("v1.0.0", &head).unwrap();
        assert_eq!(
            git_stdout(&repo.path(), &["cat-file", "-t", "refs/tags/v1.0.0"]),
            "commit"
        );

        let err = git.create_tag("v1.0.0", &repo.rev("HEAD~1")).unwrap_err();
        assert!(matches!(err, GitError::RefExists { .. }));
        assert_eq!(git.resolve_tag("v1.0.0").unwrap(), head);
    }

    #[test]
    fn create_tag_rejects_invalid_name() {
        let repo = TestRepo::new();
        let err = repo
            .git()
            .create_tag("bad..name", &repo.rev("HEAD"))
            .unwrap_err();
        assert!(matches!(err, GitError::InvalidRefName { .. }));
    }

    #[test]
    fn delete_tag() {
        let repo = TestRepo::new();
        repo.tag("v1.0.0", "HEAD");
        let git = repo.git();

        git.delete_tag("v1.0.0").unwrap();
        assert!(!git.tag_exists("v1.0.0"));
        assert!(matches!(
            git.delete_tag("v1.0.0").unwrap_err(),
            GitError::RefNotFound { .. }
        ));
    }

    #[test]
    fn remote_url_for_unknown_remote() {
        let repo = TestRepo::new().with_origin();
        let git = repo.git();
        assert!(git.remote_url("origin").unwrap().is_some());
        assert_eq!(git.remote_url("upstream").unwrap(), None);
    }

    #[test]
    fn push_and_delete_remote_tag() {
        let repo = TestRepo::new().with_origin();
        repo.tag("v1.0.0", "HEAD");
        let git = repo.git();

        git.push_tag("origin", "v1.0.0").unwrap();
        assert_eq!(repo.origin_tags(), vec!["v1.0.0"]);
        assert_eq!(git.list_remote_tags("origin").unwrap(), vec!["v1.0.0"]);

        git.delete_remote_tag("origin", "v1.0.0").unwrap();
        assert!(repo.origin_tags().is_empty());
    }

    #[test]
    fn delete_missing_remote_tag_leaves_remote_alone() {
        let repo = TestRepo::new().with_origin();
        repo.tag("v1.0.0", "HEAD");
        repo.push_tags();

        // Whether this fails depends on the transport; either way nothing changes
        let _ = repo.git().delete_remote_tag("origin", "v9.9.9");
        assert_eq!(repo.origin_tags(), vec!["v1.0.0"]);
    }


    #[test]
    fn list_remote_tags_hides_peeled_entries() {
        let repo = TestRepo::new().with_origin();
        repo.annotated_tag("v1.0.0", "HEAD");
        repo.tag("v0.9.0", "HEAD~1");
        repo.push_tags();

        assert_eq!(
            repo.git().list_remote_tags("origin").unwrap(),
            vec!["v0.9.0", "v1.0.0"]
        );
    }
}

// =============================================================================
// TagStore over a real repository
// =============================================================================

mod store {
    use super::*;

    #[test]
    fn errors_carry_tag_names() {
        let repo = TestRepo::new();
        repo.tag("v1.0.0", "HEAD");
        let git = repo.git();
        let store: &dyn TagStore = &git;

        assert_eq!(
            store.resolve("v2.0.0"),
            Err(StoreError::NotFound("v2.0.0".to_string()))
        );
        assert_eq!(
            store.create_tag("v1.0.0", &repo.rev("HEAD")),
            Err(StoreError::AlreadyExists("v1.0.0".to_string()))
        );
    }

    #[test]
    fn push_to_unknown_remote_is_backend_error() {
        let repo = TestRepo::new();
        repo.tag("v1.0.0", "HEAD");
        let git = repo.git();
        let err = TagStore::push_ref(&git, "nowhere", "v1.0.0").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}

// =============================================================================
// Engine against a real repository
// =============================================================================

mod engine {
    use super::*;

    #[test]
    fn audit_ten_tags() {
        let repo = TestRepo::new();
        ten_tag_repo(&repo);

        let report = audit(&repo.git(), &NamingScheme::default()).unwrap();
        assert_eq!(report.total(), 10);
        assert_eq!(report.rename_count(), 2);
        assert_eq!(report.delete_count(), 8);
    }

    #[test]
    fn plan_does_not_mutate() {
        let repo = TestRepo::new();
        ten_tag_repo(&repo);
        let before = repo.git_tags();

        let plan = plan(&repo.git(), &NamingScheme::default()).unwrap();
        assert_eq!(plan.to_rename.len(), 2);
        assert_eq!(plan.to_delete.len(), 8);
        assert_eq!(repo.git_tags(), before);
    }

    #[tokio::test]
    async fn execute_ten_tags_locally() {
        let repo = TestRepo::new();
        ten_tag_repo(&repo);
        let git = repo.git();

        let result = Executor::new(&git, NamingScheme::default())
            .execute(None)
            .await
            .unwrap();

        assert!(result.is_clean(), "{:?}", result.error_messages());
        assert_eq!(result.renamed_count(), 2);
        assert_eq!(result.deleted_count(), 8);
        assert_eq!(repo.git_tags(), vec!["v1.1.20", "v1.1.21"]);
        assert_eq!(git.resolve_tag("v1.1.20").unwrap(), repo.rev("HEAD~1"));
        assert_eq!(git.resolve_tag("v1.1.21").unwrap(), repo.rev("HEAD"));
    }

    #[tokio::test]
    async fn execute_mirrors_onto_origin() {
        let repo = TestRepo::new().with_origin();
        ten_tag_repo(&repo);
        repo.push_tags();
        let git = repo.git();

        let result = Executor::new(&git, NamingScheme::default())
            .execute(Some("origin"))
            .await
            .unwrap();

        assert!(result.is_clean(), "{:?}", result.error_messages());
        assert_eq!(repo.git_tags(), vec!["v1.1.20", "v1.1.21"]);
        assert_eq!(repo.origin_tags(), vec!["v1.1.20", "v1.1.21"]);
        assert_eq!(
            git.list_remote_tags("origin").unwrap(),
            vec!["v1.1.20", "v1.1.21"]
        );
    }

    #[tokio::test]
    async fn annotated_legacy_tag_renamed_to_same_commit() {
        let repo = TestRepo::new();
        repo.annotated_tag("nWave_v3.0.0", "HEAD~1");
        let git = repo.git();

        let result = Executor::new(&git, NamingScheme::default())
            .execute(None)
            .await
            .unwrap();

        assert!(result.is_clean());
        assert_eq!(repo.git_tags(), vec!["v3.0.0"]);
        assert_eq!(git.resolve_tag("v3.0.0").unwrap(), repo.rev("HEAD~1"));
    }

    #[tokio::test]
    async fn conflict_at_different_commit_touches_neither_tag() {
        let repo = TestRepo::new();
        repo.tag("nWave_v1.0.0", "HEAD~1");
        repo.tag("v1.0.0", "HEAD");
        let git = repo.git();

        let result = Executor::new(&git, NamingScheme::default())
            .execute(None)
            .await
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert!(result.error_messages()[0].starts_with("Conflict: nWave_v1.0.0 and v1.0.0"));
        assert!(result.renamed.is_empty());
        assert!(result.deleted.is_empty());
        assert_eq!(repo.git_tags(), vec!["nWave_v1.0.0", "v1.0.0"]);
        assert_eq!(git.resolve_tag("v1.0.0").unwrap(), repo.rev("HEAD"));
        assert_eq!(git.resolve_tag("nWave_v1.0.0").unwrap(), repo.rev("HEAD~1"));
    }

    #[tokio::test]
    async fn second_run_deletes_previously_renamed_tags() {
        let repo = TestRepo::new();
        ten_tag_repo(&repo);
        let git = repo.git();
        let scheme = NamingScheme::default();

        Executor::new(&git, scheme.clone())
            .execute(None)
            .await
            .unwrap();
        // Renamed tags are only protected within their own run
        let second = Executor::new(&git, scheme).execute(None).await.unwrap();

        assert!(second.renamed.is_empty());
        assert_eq!(second.deleted, vec!["v1.1.20", "v1.1.21"]);
        assert!(repo.git_tags().is_empty());
    }
}

//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! Commands call [`create_forge`] with whatever the user supplied for the
//! hosted repository (`--repo`, config, or a remote URL) and never import
//! [`GitHubForge`] directly.

use super::github::{parse_github_url, GitHubForge};
use super::traits::{Forge, ForgeError};

/// Environment variables searched for an API token when none is configured.
pub const DEFAULT_TOKEN_ENVS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Parse a repository identifier into (owner, repo).
///
/// Accepts `owner/repo` as well as GitHub remote URLs.
///
/// # Example
///
/// ```
/// use tagshift::forge::parse_repo_id;
///
/// assert_eq!(
///     parse_repo_id("octocat/hello-world"),
///     Some(("octocat".to_string(), "hello-world".to_string()))
/// );
/// assert_eq!(
///     parse_repo_id("git@github.com:octocat/hello-world.git"),
///     Some(("octocat".to_string(), "hello-world".to_string()))
/// );
/// assert_eq!(parse_repo_id("hello-world"), None);
/// ```
pub fn parse_repo_id(spec: &str) -> Option<(String, String)> {
    if let Some(parsed) = parse_github_url(spec) {
        return Some(parsed);
    }

    if spec.contains(':') {
        return None;
    }

    let (owner, repo) = spec.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Look up an API token.
///
/// With `token_env` set, only that variable is consulted. Otherwise
/// [`DEFAULT_TOKEN_ENVS`] are tried in order. Empty values count as unset.
pub fn token_from_env(token_env: Option<&str>) -> Option<String> {
    token_from(token_env, |name| std::env::var(name).ok())
}

fn token_from(
    token_env: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let names: Vec<&str> = match token_env {
        Some(name) => vec![name],
        None => DEFAULT_TOKEN_ENVS.to_vec(),
    };

    names
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.trim().is_empty())
}

/// Create a forge for the given repository.
///
/// # Arguments
///
/// * `repo_spec` - `owner/repo` or a GitHub remote URL
/// * `token` - API token
/// * `api_base` - Custom API base URL (GitHub Enterprise), `None` for github.com
///
/// # Errors
///
/// Returns `ForgeError::NotFound` if `repo_spec` cannot be parsed.
pub fn create_forge(
    repo_spec: &str,
    token: &str,
    api_base: Option<&str>,
) -> Result<Box<dyn Forge>, ForgeError> {
    let (owner, repo) = parse_repo_id(repo_spec).ok_or_else(|| {
        ForgeError::NotFound(format!(
            "cannot parse repository '{}', expected owner/repo",
            repo_spec
        ))
    })?;

    let forge = match api_base {
        Some(base) => GitHubForge::with_api_base(token, owner, repo, base),
        None => GitHubForge::new(token, owner, repo),
    };
    Ok(Box::new(forge))
}

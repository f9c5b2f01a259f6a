//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! Deleting a release by tag takes two calls: the release id is looked up
//! with `GET /repos/{owner}/{repo}/releases/tags/{tag}`, then removed with
//! `DELETE /repos/{owner}/{repo}/releases/{id}`. Deleting the release
//! leaves the git tag alone; tagshift removes that itself.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` when limits are hit. There is no
//! automatic retry.
//!
//! # Timeouts
//!
//! Every request, body included, is bounded by [`REQUEST_TIMEOUT`]. A
//! request that runs over fails with `ForgeError::NetworkError`.
//!
//! # Example
//!
//! ```ignore
//! use tagshift::forge::github::GitHubForge;
//! use tagshift::forge::Forge;
//!
//! let forge = GitHubForge::new(token, "octocat", "hello-world");
//! forge.delete_release("v1.0.0").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use super::traits::{Forge, ForgeError, Release};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Upper bound on a single API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("tagshift/", env!("CARGO_PKG_VERSION"));

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
    /// Per-request deadline
    timeout: Duration,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Release as returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    id: u64,
    tag_name: String,
    name: Option<String>,
}

impl From<GitHubRelease> for Release {
    fn from(release: GitHubRelease) -> Self {
        Release {
            id: release.id,
            tag_name: release.tag_name,
            name: release.name,
        }
    }
}

impl GitHubForge {
    /// Create a forge for a repository on github.com.
    pub fn new(token: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`)
    /// and for pointing tests at a local mock server.
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Replace the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    ///
    /// Segments are percent-encoded, so tag names containing `/` stay one
    /// path segment.
    fn repo_url(&self, segments: &[&str]) -> Result<Url, ForgeError> {
        let invalid = || ForgeError::ApiError {
            status: 0,
            message: format!("invalid API base URL '{}'", self.api_base),
        };

        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(response: Response) -> Result<T, ForgeError> {
        let status = response.status();

        // Try to get error message from body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                if message.to_lowercase().contains("rate limit") {
                    ForgeError::RateLimited
                } else {
                    ForgeError::AuthFailed(format!("Permission denied: {}", message))
                }
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn find_release(&self, tag: &str) -> Result<Option<Release>, ForgeError> {
        let url = self.repo_url(&["releases", "tags", tag])?;

        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Self::handle_error_response(response).await;
        }

        let release: GitHubRelease = response.json().await.map_err(|e| ForgeError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;
        Ok(Some(release.into()))
    }

    async fn delete_release(&self, tag: &str) -> Result<(), ForgeError> {
        let release = self
            .find_release(tag)
            .await?
            .ok_or_else(|| ForgeError::NotFound(format!("no release for tag {}", tag)))?;

        let url = self.repo_url(&["releases", &release.id.to_string()])?;
        let response = self
            .client
            .delete(url)
            .headers(self.headers()?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Self::handle_error_response(response).await
        }
    }
}

/// Parse a GitHub remote URL to extract owner and repo.
///
/// Supports both SSH and HTTPS formats:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo`
///
/// # Example
///
/// ```
/// use tagshift::forge::github::parse_github_url;
///
/// let (owner, repo) = parse_github_url("git@github.com:octocat/hello-world.git").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;

    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let (owner, repo) = rest.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

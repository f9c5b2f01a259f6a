//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$TAGSHIFT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tagshift/config.toml`
//! 3. `~/.tagshift/config.toml`
//!
//! # Repo Config
//!
//! Located at `<common_dir>/tagshift/config.toml`.
//!
//! # Validation
//!
//! Each file is validated on its own after parsing. The merged naming
//! scheme is validated again by [`super::Config`], since a prefix from one
//! scope can combine badly with a prefix from the other.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// [naming]
/// legacy_prefix = "nWave_v"
/// target_prefix = "v"
///
/// [github]
/// api_base = "https://github.example.com/api/v3"
/// token_env = "GHE_TOKEN"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default tag naming scheme
    pub naming: Option<NamingConfig>,

    /// GitHub API settings
    pub github: Option<GithubConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(naming) = &self.naming {
            naming.validate()?;
        }

        if let Some(github) = &self.github {
            // The hosted repository is a property of one repository, not the user
            if github.repo.is_some() {
                return Err(ConfigError::InvalidValue(
                    "github.repo is only valid in repository config".to_string(),
                ));
            }
            github.validate()?;
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// remote = "origin"
///
/// [github]
/// repo = "myorg/myrepo"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Remote mirrored by `execute` when `--remote` is not given
    pub remote: Option<String>,

    /// Tag naming scheme for this repository
    pub naming: Option<NamingConfig>,

    /// Hosted repository and API settings
    pub github: Option<GithubConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            if remote.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "remote cannot be empty".to_string(),
                ));
            }
        }

        if let Some(naming) = &self.naming {
            naming.validate()?;
        }

        if let Some(github) = &self.github {
            github.validate()?;
        }

        Ok(())
    }
}

/// Prefixes of the legacy and new tag schemes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Tags starting with this prefix are renamed
    pub legacy_prefix: Option<String>,

    /// Prefix renamed tags receive
    pub target_prefix: Option<String>,
}

impl NamingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(legacy) = &self.legacy_prefix {
            if legacy.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "naming.legacy_prefix cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// GitHub settings for hosted-release cleanup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Hosted repository in `owner/repo` form
    pub repo: Option<String>,

    /// API base URL (GitHub Enterprise)
    pub api_base: Option<String>,

    /// Environment variable holding the API token
    pub token_env: Option<String>,
}

impl GithubConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(repo) = &self.repo {
            if crate::forge::parse_repo_id(repo).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid github.repo '{}', expected owner/repo",
                    repo
                )));
            }
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid github.api_base '{}', expected an http(s) URL",
                    api_base
                )));
            }
        }

        if let Some(token_env) = &self.token_env {
            if token_env.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "github.token_env cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.naming.is_none());
            assert!(config.github.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn repo_not_allowed_globally() {
            let config = GlobalConfig {
                github: Some(GithubConfig {
                    repo: Some("octocat/hello-world".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let config = GlobalConfig {
                naming: Some(NamingConfig {
                    legacy_prefix: Some("old-".to_string()),
                    target_prefix: Some("new-".to_string()),
                }),
                github: Some(GithubConfig {
                    repo: None,
                    api_base: Some("https://github.example.com/api/v3".to_string()),
                    token_env: Some("GHE_TOKEN".to_string()),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: GlobalConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }
    }

    mod repo_config {
        use super::*;

        #[test]
        fn parses_full_file() {
            let toml = r#"
                remote = "origin"

                [naming]
                legacy_prefix = "nWave_v"
                target_prefix = "v"

                [github]
                repo = "octocat/hello-world"
            "#;

            let config: RepoConfig = toml::from_str(toml).unwrap();
            assert_eq!(config.remote.as_deref(), Some("origin"));
            assert_eq!(
                config.github.as_ref().and_then(|g| g.repo.as_deref()),
                Some("octocat/hello-world")
            );
            assert!(config.validate().is_ok());
        }

        #[test]
        fn empty_remote_rejected() {
            let config = RepoConfig {
                remote: Some("".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn malformed_repo_rejected() {
            let config = RepoConfig {
                github: Some(GithubConfig {
                    repo: Some("just-a-name".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn non_http_api_base_rejected() {
            let config = RepoConfig {
                github: Some(GithubConfig {
                    api_base: Some("ftp://example.com".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_legacy_prefix_rejected() {
            let config = RepoConfig {
                naming: Some(NamingConfig {
                    legacy_prefix: Some(String::new()),
                    target_prefix: None,
                }),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                remote = "origin"
                unknown_field = true
            "#;

            let result: Result<RepoConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }
    }
}

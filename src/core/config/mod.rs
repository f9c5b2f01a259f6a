//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! tagshift has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (passed to the accessors as overrides)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$TAGSHIFT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/tagshift/config.toml`
//! 3. `~/.tagshift/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use tagshift::core::config::Config;
//! use tagshift::core::paths::TagshiftPaths;
//! use std::path::PathBuf;
//!
//! let paths = TagshiftPaths::new(PathBuf::from("/path/to/repo/.git"));
//! let config = Config::load(Some(&paths)).unwrap();
//!
//! let scheme = config.naming_scheme(None, None).unwrap();
//! println!("Legacy prefix: {}", scheme.legacy_prefix());
//! println!("Remote: {:?}", config.remote());
//! ```

pub mod schema;

pub use schema::{GithubConfig, GlobalConfig, NamingConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::naming::{NamingScheme, DEFAULT_LEGACY_PREFIX, DEFAULT_TARGET_PREFIX};
use crate::core::paths::TagshiftPaths;
use crate::forge::github::DEFAULT_API_BASE;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically. Repo config overrides global
/// config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `paths` is provided, also loads the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(paths: Option<&TagshiftPaths>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        let repo_path = paths
            .map(TagshiftPaths::repo_config_path)
            .filter(|p| p.exists());
        Self::load_from(global_path.as_deref(), repo_path.as_deref())
    }

    /// Load configuration from explicit file locations.
    pub fn load_from(
        global_path: Option<&Path>,
        repo_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global: GlobalConfig = match global_path {
            Some(path) => Self::read_config(path)?,
            None => GlobalConfig::default(),
        };
        let repo: Option<RepoConfig> = match repo_path {
            Some(path) => Some(Self::read_config(path)?),
            None => None,
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        let config = Config {
            global,
            repo,
            global_path: global_path.map(Path::to_path_buf),
            repo_path: repo_path.map(Path::to_path_buf),
        };

        // Prefixes may come from different scopes; check the combination
        config.naming_scheme(None, None)?;

        Ok(config)
    }

    fn find_global() -> Option<PathBuf> {
        // 1. Check $TAGSHIFT_CONFIG
        if let Ok(path) = std::env::var("TAGSHIFT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/tagshift/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("tagshift/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.tagshift/config.toml
        dirs::home_dir()
            .map(|home| home.join(".tagshift/config.toml"))
            .filter(|path| path.exists())
    }

    fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Build the naming scheme, with optional CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the merged prefixes do not form
    /// a valid scheme.
    pub fn naming_scheme(
        &self,
        legacy_override: Option<&str>,
        target_override: Option<&str>,
    ) -> Result<NamingScheme, ConfigError> {
        let repo_naming = self.repo.as_ref().and_then(|r| r.naming.as_ref());
        let global_naming = self.global.naming.as_ref();

        let legacy = legacy_override
            .or_else(|| repo_naming.and_then(|n| n.legacy_prefix.as_deref()))
            .or_else(|| global_naming.and_then(|n| n.legacy_prefix.as_deref()))
            .unwrap_or(DEFAULT_LEGACY_PREFIX);
        let target = target_override
            .or_else(|| repo_naming.and_then(|n| n.target_prefix.as_deref()))
            .or_else(|| global_naming.and_then(|n| n.target_prefix.as_deref()))
            .unwrap_or(DEFAULT_TARGET_PREFIX);

        NamingScheme::new(legacy, target).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Get the configured remote.
    ///
    /// There is no default: without a remote, only the local namespace is
    /// migrated.
    pub fn remote(&self) -> Option<&str> {
        self.repo.as_ref().and_then(|r| r.remote.as_deref())
    }

    /// Get the hosted repository (`owner/repo`), if configured.
    pub fn github_repo(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.github.as_ref())
            .and_then(|g| g.repo.as_deref())
    }

    /// Get the GitHub API base URL.
    ///
    /// Defaults to the public GitHub API.
    pub fn github_api_base(&self) -> &str {
        self.github_setting(|g| g.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Get the environment variable the API token is read from, if pinned.
    pub fn github_token_env(&self) -> Option<&str> {
        self.github_setting(|g| g.token_env.as_deref())
    }

    fn github_setting<'a>(
        &'a self,
        field: impl Fn(&'a GithubConfig) -> Option<&'a str>,
    ) -> Option<&'a str> {
        self.repo
            .as_ref()
            .and_then(|r| r.github.as_ref())
            .and_then(&field)
            .or_else(|| self.global.github.as_ref().and_then(&field))
    }

    /// Global config file that was read, if any.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Repo config file that was read, if any.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

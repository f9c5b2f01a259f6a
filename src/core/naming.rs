//! core::naming
//!
//! Tag naming schemes and classification.
//!
//! # Features
//!
//! - Classify a tag as renamed or deleted by its prefix alone
//! - Compute the new-scheme name for a legacy tag
//! - Validate configured schemes so repeated runs are stable
//!
//! Classification never inspects the store; it is a pure function of the
//! tag name and the scheme.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix that marks a tag as belonging to the legacy scheme.
pub const DEFAULT_LEGACY_PREFIX: &str = "nWave_v";

/// Prefix used by the new scheme.
pub const DEFAULT_TARGET_PREFIX: &str = "v";

/// Errors from scheme validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("legacy prefix cannot be empty")]
    EmptyLegacyPrefix,

    #[error("legacy and target prefix are both '{0}'")]
    IdenticalPrefixes(String),

    #[error("target prefix '{target}' starts with legacy prefix '{legacy}'")]
    TargetShadowsLegacy { legacy: String, target: String },
}

/// How a tag is handled by a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Legacy tag: recreated under the new scheme, then removed.
    Rename,
    /// Everything else: removed.
    Delete,
}

impl Classification {
    /// Uppercase label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Rename => "RENAME",
            Classification::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Rename => write!(f, "rename"),
            Classification::Delete => write!(f, "delete"),
        }
    }
}

/// A pair of prefixes describing the legacy and the new tag scheme.
///
/// # Example
///
/// ```
/// use tagshift::core::naming::{Classification, NamingScheme};
///
/// let scheme = NamingScheme::default();
/// assert_eq!(scheme.classify("nWave_v1.1.21"), Classification::Rename);
/// assert_eq!(scheme.classify("v2.17.0"), Classification::Delete);
/// assert_eq!(scheme.rename_target("nWave_v1.1.21"), "v1.1.21");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingScheme {
    legacy_prefix: String,
    target_prefix: String,
}

impl NamingScheme {
    /// Create a validated scheme.
    ///
    /// The target prefix must not start with the legacy prefix. Otherwise a
    /// renamed tag would classify as legacy again on the next run.
    pub fn new(
        legacy_prefix: impl Into<String>,
        target_prefix: impl Into<String>,
    ) -> Result<Self, NamingError> {
        let legacy_prefix = legacy_prefix.into();
        let target_prefix = target_prefix.into();

        if legacy_prefix.is_empty() {
            return Err(NamingError::EmptyLegacyPrefix);
        }
        if legacy_prefix == target_prefix {
            return Err(NamingError::IdenticalPrefixes(legacy_prefix));
        }
        if target_prefix.starts_with(&legacy_prefix) {
            return Err(NamingError::TargetShadowsLegacy {
                legacy: legacy_prefix,
                target: target_prefix,
            });
        }

        Ok(Self {
            legacy_prefix,
            target_prefix,
        })
    }

    pub fn legacy_prefix(&self) -> &str {
        &self.legacy_prefix
    }

    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    /// Classify a tag: `Rename` iff it starts with the legacy prefix.
    pub fn classify(&self, tag: &str) -> Classification {
        if tag.starts_with(&self.legacy_prefix) {
            Classification::Rename
        } else {
            Classification::Delete
        }
    }

    /// Compute the new-scheme name for a tag.
    ///
    /// Strips the legacy prefix when present and prepends the target prefix.
    /// Only meaningful for tags that classify as `Rename`.
    pub fn rename_target(&self, tag: &str) -> String {
        let suffix = tag.strip_prefix(&self.legacy_prefix).unwrap_or(tag);
        format!("{}{}", self.target_prefix, suffix)
    }
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            legacy_prefix: DEFAULT_LEGACY_PREFIX.to_string(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
        }
    }
}

/// Classify a tag under the default scheme.
///
/// ```
/// use tagshift::core::naming::{classify, Classification};
///
/// assert_eq!(classify("nWave_v2.0.0"), Classification::Rename);
/// assert_eq!(classify("some-random-tag"), Classification::Delete);
/// ```
pub fn classify(tag: &str) -> Classification {
    NamingScheme::default().classify(tag)
}

/// Compute the rename target of a tag under the default scheme.
///
/// ```
/// use tagshift::core::naming::rename_target;
///
/// assert_eq!(rename_target("nWave_v1.1.20"), "v1.1.20");
/// ```
pub fn rename_target(tag: &str) -> String {
    NamingScheme::default().rename_target(tag)
}

//! core
//!
//! Domain types, naming rules and repository-local state for tagshift.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid
//! - [`naming`] - The legacy/target naming scheme and tag classification
//! - [`report`] - Audit reports, cleanup plans and run results
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Where tagshift keeps its files inside a repository
//! - [`lock`] - Exclusive per-repository lock for `execute`

pub mod config;
pub mod lock;
pub mod naming;
pub mod paths;
pub mod report;
pub mod types;

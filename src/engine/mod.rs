//! engine
//!
//! The classify -> plan -> execute pipeline.
//!
//! # Architecture
//!
//! - [`audit`]: read-only classification of every tag
//! - [`plan`]: the rename/delete change-set, computed without mutation
//! - [`exec`]: the two-phase migration run
//!
//! Every stage reads tags through [`crate::store::TagStore`], so the whole
//! pipeline runs unchanged against a real repository or the in-memory mock.
//!
//! # Example
//!
//! ```
//! use tagshift::core::naming::NamingScheme;
//! use tagshift::core::types::Oid;
//! use tagshift::engine::{audit, plan};
//! use tagshift::store::mock::MockTagStore;
//!
//! let commit = Oid::new("1111111111111111111111111111111111111111").unwrap();
//! let store = MockTagStore::new()
//!     .with_tag("nWave_v1.1.21", commit.clone())
//!     .with_tag("v2.17.0", commit);
//!
//! let scheme = NamingScheme::default();
//! let report = audit(&store, &scheme).unwrap();
//! assert_eq!(report.rename_count(), 1);
//!
//! let plan = plan(&store, &scheme).unwrap();
//! assert_eq!(plan.to_rename[0].new_name, "v1.1.21");
//! ```

pub mod audit;
pub mod exec;
pub mod plan;

pub use audit::audit;
pub use exec::Executor;
pub use plan::{plan, plan_from_tags};

use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Print reports as JSON instead of tables.
    pub json: bool,
    /// Legacy prefix override.
    pub legacy_prefix: Option<String>,
    /// Target prefix override.
    pub target_prefix: Option<String>,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

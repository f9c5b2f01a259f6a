//! Tagshift - Migrate a repository's tags to a new naming scheme
//!
//! Tagshift finds tags carrying a legacy prefix, recreates them under the
//! target scheme at the same commit, and deletes every other tag that does
//! not follow the target scheme. Changes can be mirrored onto a remote, and
//! hosted releases of deleted tags can be removed from GitHub.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The classify, plan and execute pipeline
//! - [`core`] - Naming rules, report types, configuration and locking
//! - [`store`] - The tag store capability the engine runs against
//! - [`git`] - Single interface for all Git operations
//! - [`forge`] - Hosted release cleanup (GitHub)
//! - [`ui`] - Output formatting
//!
//! # Guarantees
//!
//! 1. `audit` and `plan` never modify the repository
//! 2. A tag is never moved to a different commit
//! 3. A tag created by a run is never deleted by the same run
//! 4. A failing step is reported and never aborts the remaining steps

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod store;
pub mod ui;

//! store
//!
//! The tag store capability the migration engine runs against.
//!
//! # Architecture
//!
//! The engine never talks to Git directly. It sees a [`TagStore`]: a local
//! tag namespace plus the ability to mirror single ref changes onto a named
//! remote. Two implementations exist:
//!
//! - `git`: [`crate::git::Git`], backed by a real repository
//! - [`mock`]: an in-memory store for deterministic tests
//!
//! # Example
//!
//! ```
//! use tagshift::core::types::Oid;
//! use tagshift::store::{mock::MockTagStore, TagStore};
//!
//! let commit = Oid::new("1111111111111111111111111111111111111111").unwrap();
//! let store = MockTagStore::new().with_tag("nWave_v1.0.0", commit);
//! assert_eq!(store.list_tags().unwrap(), vec!["nWave_v1.0.0"]);
//! ```

mod git;
pub mod mock;
mod traits;

pub use traits::{StoreError, TagStore};

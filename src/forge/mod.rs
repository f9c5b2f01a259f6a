//! forge
//!
//! Abstraction for hosted release services.
//!
//! # Architecture
//!
//! The `Forge` trait defines how tagshift removes the hosted release that
//! belongs to a deleted tag. Commands use the [`create_forge`] factory
//! rather than constructing a specific implementation.
//!
//! Forge failures never compromise local correctness: the engine treats
//! every forge call as best-effort.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait, `Release` and `ForgeError`
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Repository parsing, token lookup and forge creation
//!
//! # Example
//!
//! ```ignore
//! use tagshift::forge::{create_forge, Forge};
//!
//! let forge = create_forge("octocat/hello-world", token, None)?;
//! forge.delete_release("v1.0.0").await?;
//! ```

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{create_forge, parse_repo_id, token_from_env, DEFAULT_TOKEN_ENVS};
pub use traits::*;

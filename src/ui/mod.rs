//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting, report rendering and diagnostics
//!
//! # Design
//!
//! All terminal output goes through this module so verbosity and JSON
//! mode are handled in one place.

pub mod output;

//! cli
//!
//! Command-line interface layer for tagshift.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Turn a run's recorded failures into the exit status
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution. All tag changes flow through the
//! engine's executor.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use std::process::ExitCode;

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    // Create context from CLI flags.
    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json,
        legacy_prefix: cli.legacy_prefix.clone(),
        target_prefix: cli.target_prefix.clone(),
    };

    // Dispatch to command handler
    commands::dispatch(cli.command.unwrap_or(Command::Audit), &ctx)
}

//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository and loads configuration
//! 2. Calls the engine
//! 3. Formats and displays output
//!
//! Handlers do NOT mutate tags directly.
//!
//! # Async Commands
//!
//! `execute` may call the GitHub API, so the executor is async. The handler
//! builds a tokio runtime and blocks on the run.

mod audit;
mod completion;
mod execute;
mod plan;

pub use audit::audit;
pub use completion::completion;
pub use execute::execute;
pub use plan::plan;

use std::process::ExitCode;

use anyhow::{Context as _, Result};

use super::args::Command;
use crate::core::config::Config;
use crate::core::naming::NamingScheme;
use crate::core::paths::TagshiftPaths;
use crate::engine::Context;
use crate::git::Git;
use crate::ui::output;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::Audit => audit(ctx).map(|()| ExitCode::SUCCESS),
        Command::Plan => plan(ctx).map(|()| ExitCode::SUCCESS),
        Command::Execute { remote, repo } => execute(ctx, remote.as_deref(), repo.as_deref()),
        Command::Completion { shell } => completion(shell).map(|()| ExitCode::SUCCESS),
    }
}

/// An opened repository with its configuration resolved.
struct Session {
    git: Git,
    paths: TagshiftPaths,
    config: Config,
    scheme: NamingScheme,
}

impl Session {
    fn open(ctx: &Context) -> Result<Self> {
        let cwd = match &ctx.cwd {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let git = Git::open(&cwd).context("Failed to open repository")?;
        let paths = TagshiftPaths::from_repo_info(&git.info());
        let config = Config::load(Some(&paths)).context("Failed to load configuration")?;
        for (scope, path) in [
            ("global", config.global_config_loaded_from()),
            ("repo", config.repo_config_loaded_from()),
        ] {
            if let Some(path) = path {
                output::debug(
                    format!("loaded {} config from {}", scope, path.display()),
                    ctx.verbosity(),
                );
            }
        }
        let scheme = config
            .naming_scheme(ctx.legacy_prefix.as_deref(), ctx.target_prefix.as_deref())
            .context("Invalid naming scheme")?;

        Ok(Self {
            git,
            paths,
            config,
            scheme,
        })
    }
}

//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>` (alias `--repo-path`): Run against the repository at that path
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Print reports as JSON
//! - `--legacy-prefix` / `--target-prefix`: Override the naming scheme

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tagshift - migrate a repository's tags from a legacy naming scheme
#[derive(Parser, Debug)]
#[command(name = "tagshift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
Without a subcommand, tagshift runs `audit`.

WORKFLOW EXAMPLES:
    # See how every tag is classified
    tagshift

    # Preview the renames and deletions
    tagshift plan

    # Apply locally and on origin, and delete the GitHub releases of deleted tags
    tagshift execute --remote origin --repo myorg/myrepo")]
pub struct Cli {
    /// Run against the repository containing this directory
    #[arg(long, global = true, visible_alias = "repo-path", value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Prefix marking legacy tags [default: nWave_v]
    #[arg(long, global = true, value_name = "PREFIX")]
    pub legacy_prefix: Option<String>,

    /// Prefix renamed tags receive [default: v]
    #[arg(long, global = true, value_name = "PREFIX")]
    pub target_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Classify every tag (read-only)
    #[command(
        name = "audit",
        long_about = "Classify every tag in the repository.\n\n\
            Tags starting with the legacy prefix are marked RENAME; every other \
            tag is marked DELETE. Nothing is changed."
    )]
    Audit,

    /// Show the renames and deletions execute would perform (read-only)
    #[command(
        name = "plan",
        long_about = "Show what `execute` would change.\n\n\
            Lists each legacy tag with its new name, then every tag that would be \
            deleted. Nothing is changed."
    )]
    Plan,

    /// Rename legacy tags and delete every other tag
    #[command(
        name = "execute",
        long_about = "Rename legacy tags and delete every other tag.\n\n\
            Runs in two phases. First each legacy tag is recreated under the new \
            scheme at the same commit and the legacy tag is removed. Then every \
            remaining tag that is not a legacy tag is deleted, except the tags the \
            first phase created.\n\n\
            A rename whose target already exists at the same commit only removes the \
            legacy tag. If the target exists at a different commit, both tags are \
            left alone and an error is reported.\n\n\
            Failures do not stop the run. They are listed at the end and the exit \
            status is 1.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Local tags only
    tagshift execute

    # Mirror every change onto origin
    tagshift execute --remote origin

    # Also delete GitHub releases of deleted tags (token from GITHUB_TOKEN or GH_TOKEN)
    tagshift execute --remote origin --repo myorg/myrepo"
    )]
    Execute {
        /// Remote to mirror renames and deletions onto
        #[arg(long, value_name = "NAME")]
        remote: Option<String>,

        /// GitHub repository whose releases of deleted tags are removed
        #[arg(long, value_name = "OWNER/REPO")]
        repo: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    tagshift completion bash > ~/.local/share/bash-completion/completions/tagshift

    # Zsh
    tagshift completion zsh > ~/.zfunc/_tagshift

    # Fish
    tagshift completion fish > ~/.config/fish/completions/tagshift.fish

    # PowerShell
    tagshift completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

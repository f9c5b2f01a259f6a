//! execute command - Rename legacy tags and delete the rest

use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use super::Session;
use crate::core::lock::RepoLock;
use crate::core::report::{CleanupPlan, ExecuteResult};
use crate::engine::{self, Context, Executor};
use crate::forge::{self, Forge};
use crate::ui::output::{self, Verbosity};

/// JSON shape of an execute run.
#[derive(Serialize)]
struct ExecuteReport<'a> {
    plan: &'a CleanupPlan,
    result: &'a ExecuteResult,
}

/// Run the migration.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `remote` - Remote to mirror onto; falls back to the configured remote
/// * `repo` - GitHub repository for release cleanup; falls back to config
///
/// Returns exit status 1 when any operation of the run failed.
pub fn execute(ctx: &Context, remote: Option<&str>, repo: Option<&str>) -> Result<ExitCode> {
    let session = Session::open(ctx)?;
    let verbosity = ctx.verbosity();

    let remote = remote.or(session.config.remote());
    if let Some(name) = remote {
        if session.git.remote_url(name)?.is_none() {
            bail!("Remote '{}' does not exist", name);
        }
    }

    let forge = release_forge(&session, repo, remote, verbosity)?;

    let _lock = RepoLock::acquire(&session.paths).context("Failed to lock repository")?;

    let plan = engine::plan(&session.git, &session.scheme).context("Failed to read tags")?;
    if !ctx.json {
        output::print(output::render_plan(&plan), verbosity);
        output::print("\nExecuting cleanup...", verbosity);
    }

    let mut executor =
        Executor::new(&session.git, session.scheme.clone()).with_verbosity(verbosity);
    if let Some(forge) = forge.as_deref() {
        executor = executor.with_forge(forge);
    }

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt
        .block_on(executor.execute(remote))
        .context("Failed to read tags")?;

    if ctx.json {
        output::json(&ExecuteReport {
            plan: &plan,
            result: &result,
        })?;
    } else {
        output::print(format!("\n{}", output::render_result(&result)), verbosity);
    }

    Ok(if result.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Build the forge for hosted-release cleanup, if it can run.
///
/// Missing credentials or a missing remote only disable the cleanup.
fn release_forge(
    session: &Session,
    repo: Option<&str>,
    remote: Option<&str>,
    verbosity: Verbosity,
) -> Result<Option<Box<dyn Forge>>> {
    let Some(repo) = repo.or(session.config.github_repo()) else {
        return Ok(None);
    };

    if remote.is_none() {
        output::warn(
            format!(
                "releases of {} are only cleaned up together with --remote; skipping",
                repo
            ),
            verbosity,
        );
        return Ok(None);
    }

    let token_env = session.config.github_token_env();
    let Some(token) = forge::token_from_env(token_env) else {
        let searched = match token_env {
            Some(name) => format!("${}", name),
            None => forge::DEFAULT_TOKEN_ENVS
                .iter()
                .map(|name| format!("${}", name))
                .collect::<Vec<_>>()
                .join(" or "),
        };
        output::warn(
            format!(
                "no GitHub token in {}; releases of deleted tags will be kept",
                searched
            ),
            verbosity,
        );
        return Ok(None);
    };

    let forge = forge::create_forge(repo, &token, Some(session.config.github_api_base()))
        .with_context(|| format!("Invalid --repo '{}'", repo))?;
    output::debug(
        format!("deleting {} releases of deleted tags in {}", forge.name(), repo),
        verbosity,
    );
    Ok(Some(forge))
}

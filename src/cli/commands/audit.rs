//! audit command - Classify every tag

use anyhow::{Context as _, Result};

use super::Session;
use crate::engine::{self, Context};
use crate::ui::output;

/// Print every tag with its classification and a summary.
pub fn audit(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let report = engine::audit(&session.git, &session.scheme).context("Failed to read tags")?;

    if ctx.json {
        output::json(&report)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    output::print(output::render_audit(&report), verbosity);
    output::print(
        "\nAudit only. Run `tagshift plan` to see the change plan, `tagshift execute` to apply.",
        verbosity,
    );
    Ok(())
}

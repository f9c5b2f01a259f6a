//! plan command - Preview renames and deletions

use anyhow::{Context as _, Result};

use super::Session;
use crate::engine::{self, Context};
use crate::ui::output;

/// Print the change-set `execute` would apply.
pub fn plan(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let plan = engine::plan(&session.git, &session.scheme).context("Failed to read tags")?;

    if ctx.json {
        output::json(&plan)?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    output::print(output::render_plan(&plan), verbosity);
    output::print(
        "\nDry run. Run `tagshift execute` to actually rename and delete.",
        verbosity,
    );
    Ok(())
}

//! Suggest command implementation.

use filterbox::suggest::complete;
use tracing::debug;

use super::schema::load_grid;
use super::{CommandContext, Result};
use crate::output;

/// Executes the suggest command.
///
/// The cursor defaults to the end of `text` and is clamped into it.
pub fn execute(ctx: &CommandContext, text: &str, cursor: Option<usize>) -> Result<()> {
    let grid = load_grid(ctx)?;
    let cursor = cursor.unwrap_or(text.len());
    debug!(cursor, "computing suggestions");

    let completion = complete(text, cursor, &grid);

    if ctx.json_output {
        println!("{}", output::format_completion_json(&completion)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            output::format_completion_table(&completion, ctx.use_colors)
        );
    }

    Ok(())
}

//! Categories command implementation.

use super::schema::load_grid;
use super::{CommandContext, Result};
use crate::output;

/// Executes the categories command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let grid = load_grid(ctx)?;

    if ctx.json_output {
        println!("{}", output::format_categories_json(&grid)?);
    } else if !ctx.quiet {
        print!("{}", output::format_categories_table(&grid, ctx.use_colors));
    }

    Ok(())
}

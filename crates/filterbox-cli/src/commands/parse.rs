//! Parse command implementation.
//!
//! Prints the canonical form and tree of a query, or the syntax error with a
//! caret under its position.

use super::schema::load_parser;
use super::{CommandContext, Result};
use crate::output::{self, helpers::format_error_caret};

/// Executes the parse command.
///
/// # Errors
///
/// Returns [`super::CommandError::Parse`] if the query does not parse.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let parser = load_parser(ctx)?;

    let forest = match parser.parse(query) {
        Ok(forest) => forest,
        Err(e) => {
            if !ctx.json_output && !ctx.quiet {
                eprint!("{}", format_error_caret(query, e.position(), ctx.use_colors));
            }
            return Err(e.into());
        }
    };

    if ctx.json_output {
        println!("{}", output::format_parse_json(&forest)?);
    } else if !ctx.quiet {
        print!("{}", output::format_parse_table(&forest, ctx.use_colors));
    }

    Ok(())
}

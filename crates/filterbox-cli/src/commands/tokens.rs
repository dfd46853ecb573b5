//! Tokens command implementation.

use super::schema::load_parser;
use super::{CommandContext, Result};
use crate::output;

/// Executes the tokens command.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let tokens = load_parser(ctx)?.tokenize(query);

    if ctx.json_output {
        println!("{}", output::format_tokens_json(&tokens)?);
    } else if !ctx.quiet {
        print!("{}", output::format_tokens_table(&tokens, ctx.use_colors));
    }

    Ok(())
}

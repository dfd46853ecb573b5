//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, SchemaCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// A resolved command, borrowing its arguments from the parsed CLI.
#[derive(Debug)]
pub enum Dispatch<'a> {
    Parse { query: &'a str },
    Validate { query: &'a str },
    Suggest { text: &'a str, cursor: Option<usize> },
    Tokens { query: &'a str },
    Categories,
    Schema(&'a Option<SchemaCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Parse { query }) => Self::Parse { query },
            Some(Commands::Validate { query }) => Self::Validate { query },
            Some(Commands::Suggest { text, cursor }) => Self::Suggest {
                text,
                cursor: *cursor,
            },
            Some(Commands::Tokens { query }) => Self::Tokens { query },
            Some(Commands::Categories) => Self::Categories,
            Some(Commands::Schema { command }) => Self::Schema(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }

    /// Runs the command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Parse { query } => commands::parse::execute(ctx, query),
            Self::Validate { query } => commands::validate::execute(ctx, query),
            Self::Suggest { text, cursor } => commands::suggest::execute(ctx, text, *cursor),
            Self::Tokens { query } => commands::tokens::execute(ctx, query),
            Self::Categories => commands::categories::execute(ctx),
            Self::Schema(command) => dispatch_schema(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("fbx - filter query tool");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch schema subcommands.
fn dispatch_schema(ctx: &CommandContext, command: &Option<SchemaCommands>) -> Result<()> {
    match command {
        Some(SchemaCommands::Show) | None => commands::schema::execute_show(ctx),
        Some(SchemaCommands::Path) => commands::schema::execute_path(ctx),
        Some(SchemaCommands::Init { force }) => commands::schema::execute_init(ctx, *force),
    }
}

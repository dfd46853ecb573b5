//! Command implementations for the fbx CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod categories;
pub mod completions;
pub mod parse;
pub mod schema;
pub mod suggest;
pub mod tokens;
pub mod validate;

use std::env;
use std::path::PathBuf;

use filterbox::query::ParsedError;
use filterbox::schema::SchemaError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query syntax error.
    #[error("parse error: {0}")]
    Parse(#[from] ParsedError),

    /// Query parsed but failed validation.
    #[error("invalid query: {0}")]
    Invalid(String),

    /// Schema could not be built from its description.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Schema file given by flag or `FBX_SCHEMA`.
    pub schema_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            schema_path: cli.schema.clone(),
        }
    }
}

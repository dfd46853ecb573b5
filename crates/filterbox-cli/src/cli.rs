//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the fbx CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// fbx - Parse, validate and autocomplete filter queries
#[derive(Parser, Debug)]
#[command(name = "fbx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Schema file (default: ~/.config/fbx/schema.toml)
    #[arg(long, global = true, env = "FBX_SCHEMA")]
    pub schema: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a query and print its canonical form and tree
    #[command(alias = "p")]
    Parse {
        /// Query text, e.g. 'column1 == ABC AND column2 contains x'
        query: String,
    },

    /// Validate a query against the schema
    #[command(alias = "v")]
    Validate {
        /// Query text
        query: String,
    },

    /// Suggest completions at a cursor position
    #[command(alias = "s")]
    Suggest {
        /// Partially typed query
        text: String,

        /// Cursor byte offset (default: end of text)
        #[arg(short, long)]
        cursor: Option<usize>,
    },

    /// Show the tokens of a query with their offsets
    Tokens {
        /// Query text
        query: String,
    },

    /// List schema categories and their operators
    Categories,

    /// Manage the schema file
    Schema {
        #[command(subcommand)]
        command: Option<SchemaCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Schema subcommands
#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// Show the loaded schema
    Show,

    /// Print the schema file path
    Path,

    /// Write a starter schema file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["fbx"]);
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "fbx",
            "--json",
            "--no-color",
            "--schema",
            "/tmp/schema.toml",
            "categories",
        ]);
        assert!(cli.json);
        assert!(cli.no_color);
        assert_eq!(cli.schema, Some(PathBuf::from("/tmp/schema.toml")));
        assert!(matches!(cli.command, Some(Commands::Categories)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fbx", "validate", "a == b", "-v"]);
        assert!(cli.verbose);
        if let Some(Commands::Validate { query }) = cli.command {
            assert_eq!(query, "a == b");
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["fbx", "-v", "-q", "categories"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_alias() {
        let cli = Cli::parse_from(["fbx", "p", "column1 == ABC"]);
        if let Some(Commands::Parse { query }) = cli.command {
            assert_eq!(query, "column1 == ABC");
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_suggest_with_cursor() {
        let cli = Cli::parse_from(["fbx", "suggest", "column1 ", "--cursor", "4"]);
        if let Some(Commands::Suggest { text, cursor }) = cli.command {
            assert_eq!(text, "column1 ");
            assert_eq!(cursor, Some(4));
        } else {
            panic!("Expected Suggest command");
        }
    }

    #[test]
    fn test_suggest_default_cursor() {
        let cli = Cli::parse_from(["fbx", "suggest", "col"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Suggest { cursor: None, .. })
        ));
    }

    #[test]
    fn test_schema_init_force() {
        let cli = Cli::parse_from(["fbx", "schema", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Schema {
                command: Some(SchemaCommands::Init { force: true })
            })
        ));
    }

    #[test]
    fn test_schema_without_subcommand() {
        let cli = Cli::parse_from(["fbx", "schema"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Schema { command: None })
        ));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["fbx", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}

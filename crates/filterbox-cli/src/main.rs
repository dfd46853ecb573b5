use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::{CommandContext, CommandError};
use dispatch::Dispatch;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter, e.g. `FBX_LOG=filterbox=trace`.
const LOG_ENV: &str = "FBX_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(error_exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);
    let dispatch = Dispatch::from_cli(cli);
    tracing::debug!(command = ?dispatch, "dispatching");
    dispatch.execute(&ctx)
}

/// Returns the default log level for the verbosity flags.
fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Installs a stderr log subscriber. `FBX_LOG` overrides the flags.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Parse(_) => "PARSE_ERROR",
        CommandError::Invalid(_) => "INVALID_QUERY",
        CommandError::Schema(_) => "SCHEMA_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> u8 {
    match e {
        CommandError::Parse(_) | CommandError::Invalid(_) | CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Config(_) | CommandError::Schema(_) => 5,
    }
}

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;
mod snapshot;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, Config};
use commands::list::ListOptions;
use commands::{CommandContext, CommandError};

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
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    // Printing the path must work even when the file itself is broken.
    if let Commands::Config {
        command: ConfigCommands::Path,
    } = &cli.command
    {
        let ctx = CommandContext::new(cli, &Config::default());
        return commands::config::execute_path(&ctx);
    }

    let config = load_config()?;
    let ctx = CommandContext::new(cli, &config);

    match &cli.command {
        Commands::List { filter } => commands::list::execute(
            &ctx,
            &ListOptions {
                filter: filter.clone(),
            },
        ),
        Commands::Parse { filter } => commands::parse::execute(&ctx, filter),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::execute_show(&ctx, &config),
            ConfigCommands::Path => commands::config::execute_path(&ctx),
        },
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug, `--quiet`
/// selects error, and the default is warn. Returns `false` when a global
/// subscriber is already installed.
fn init_tracing(cli: &Cli) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = result {
        eprintln!("Warning: logging is unavailable: {e}");
        return false;
    }
    true
}

fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

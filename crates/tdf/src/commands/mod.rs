//! Command implementations for the tdf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod config;
pub mod list;
pub mod parse;

use std::path::PathBuf;

use chrono::{DateTime, Local};
use todo_filter::filter::{Clock, FixedClock, SystemClock};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] todo_filter::filter::FilterError),

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
    /// Snapshot path from `--data`, else from the config file.
    pub data_path: Option<PathBuf>,
    /// Pinned time from `--now`.
    pub now: Option<DateTime<Local>>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over the config file. Colors are also turned off by a
    /// non-empty `NO_COLOR` environment variable.
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            data_path: cli.data.clone().or_else(|| config.data_path.clone()),
            now: cli.now,
        }
    }

    /// Returns the clock filters are parsed against.
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.now {
            Some(now) => Box::new(FixedClock(now)),
            None => Box::new(SystemClock),
        }
    }
}

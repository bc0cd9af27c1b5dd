//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tdf CLI.

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

/// tdf - Filter a to-do snapshot with Todoist-style filter expressions
#[derive(Parser, Debug)]
#[command(name = "tdf")]
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

    /// Snapshot file to read (default: data_path from config)
    #[arg(long, global = true, env = "TDF_DATA")]
    pub data: Option<PathBuf>,

    /// Evaluate relative dates against this time instead of the system clock
    #[arg(long, global = true, value_parser = parse_now)]
    pub now: Option<DateTime<Local>>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List items matching a filter
    #[command(alias = "l")]
    List {
        /// Filter expression (e.g., "p1 & (today | tomorrow)")
        filter: Option<String>,
    },

    /// Parse a filter and print the resulting tree
    Parse {
        /// Filter expression
        filter: String,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

/// Parses `--now`: RFC 3339, or `YYYY-MM-DD[ HH:MM[:SS]]` in local time.
pub fn parse_now(value: &str) -> Result<DateTime<Local>, String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local));
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .ok_or_else(|| {
            format!("invalid time '{value}' (expected RFC 3339 or YYYY-MM-DD[ HH:MM[:SS]])")
        })?;

    naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| format!("time '{value}' cannot be placed in the local timezone"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_without_filter() {
        let cli = Cli::try_parse_from(["tdf", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List { filter: None }));
    }

    #[test]
    fn test_parse_list_with_filter_and_globals() {
        let cli = Cli::try_parse_from([
            "tdf",
            "list",
            "p1 & today",
            "--json",
            "--data",
            "/tmp/items.json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/items.json")));
        if let Commands::List { filter } = cli.command {
            assert_eq!(filter.as_deref(), Some("p1 & today"));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = Cli::try_parse_from(["tdf", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Path
            }
        ));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["tdf", "-v", "-q", "list"]).is_err());
    }

    #[test]
    fn test_parse_now_flag() {
        let cli = Cli::try_parse_from(["tdf", "--now", "2017-01-02 01:00", "parse", "today"]).unwrap();
        assert_eq!(
            cli.now,
            Some(Local.with_ymd_and_hms(2017, 1, 2, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_now_formats() {
        let expected = Local.with_ymd_and_hms(2017, 1, 2, 1, 0, 0).unwrap();
        assert_eq!(parse_now("2017-01-02 01:00"), Ok(expected));
        assert_eq!(parse_now("2017-01-02 01:00:00"), Ok(expected));
        assert_eq!(parse_now("2017-01-02T01:00:00"), Ok(expected));
        assert_eq!(
            parse_now("2017-01-02"),
            Ok(Local.with_ymd_and_hms(2017, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_now_rfc3339() {
        let parsed = parse_now("2017-01-02T01:00:00Z").unwrap();
        assert_eq!(parsed, chrono::Utc.with_ymd_and_hms(2017, 1, 2, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_now_rejects_garbage() {
        assert!(parse_now("tomorrow").is_err());
        assert!(parse_now("2017-13-01").is_err());
        assert!(parse_now("").is_err());
    }
}

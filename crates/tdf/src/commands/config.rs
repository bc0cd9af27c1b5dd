//! Config command implementation.
//!
//! View configuration settings.
//! Config file is located at ~/.config/tdf/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default snapshot file used when `--data` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_path: None,
            output: OutputConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config file path.
///
/// `TDF_CONFIG` wins, then `$XDG_CONFIG_HOME/tdf/config.toml`, then
/// `~/.config/tdf/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("TDF_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("tdf")
    } else {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config").join("tdf"))
            .ok_or_else(|| {
                CommandError::Config("Could not determine config directory".to_string())
            })?
    };

    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema; later versions step up from here.
    if config.version > CONFIG_VERSION {
        debug!(
            version = config.version,
            "config written by a newer tdf, reading known fields only"
        );
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext, config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("Settings:");
        println!("  version: {}", config.version);
        match &config.data_path {
            Some(data_path) => println!("  data_path: {}", data_path.display()),
            None => println!("  data_path: (not set)"),
        }

        println!("\n[output]");
        match config.output.color {
            Some(color) => println!("  color: {}", color),
            None => println!("  color: (default)"),
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Runs `f` with `TDF_CONFIG` and `XDG_CONFIG_HOME` set as given, then
    /// restores both.
    fn with_env<T>(tdf_config: Option<&str>, xdg: Option<&str>, f: impl FnOnce() -> T) -> T {
        let saved_config = env::var("TDF_CONFIG").ok();
        let saved_xdg = env::var("XDG_CONFIG_HOME").ok();

        match tdf_config {
            Some(value) => env::set_var("TDF_CONFIG", value),
            None => env::remove_var("TDF_CONFIG"),
        }
        match xdg {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        let result = f();

        match saved_config {
            Some(value) => env::set_var("TDF_CONFIG", value),
            None => env::remove_var("TDF_CONFIG"),
        }
        match saved_xdg {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.data_path.is_none());
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            version: CONFIG_VERSION,
            data_path: Some(PathBuf::from("/data/items.json")),
            output: OutputConfig { color: Some(true) },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("data_path = \"/data/items.json\""));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("color = true"));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        // Missing version defaults to current version
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.data_path.is_none());
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_config_deserialization_partial() {
        let toml_str = r#"
[output]
color = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.data_path.is_none());
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_migrate_config_preserves_data() {
        let config = Config {
            version: 999,
            data_path: Some(PathBuf::from("items.json")),
            output: OutputConfig { color: Some(false) },
        };

        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.data_path, Some(PathBuf::from("items.json")));
        assert_eq!(migrated.output.color, Some(false));
    }

    #[test]
    #[serial]
    fn test_config_path_honours_tdf_config() {
        let path = with_env(Some("/tmp/tdf-test/custom.toml"), None, get_config_path).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/tdf-test/custom.toml"));
    }

    #[test]
    #[serial]
    fn test_config_path_uses_xdg_config_home() {
        let path = with_env(None, Some("/tmp/xdg"), get_config_path).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/xdg/tdf/config.toml"));
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");
        let config = with_env(path.to_str(), None, load_config).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.data_path.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "data_path = \"/srv/todo.json\"\n\n[output]\ncolor = false\n",
        )
        .unwrap();

        let config = with_env(path.to_str(), None, load_config).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("/srv/todo.json")));
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    #[serial]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "data_path = [unterminated").unwrap();

        let result = with_env(path.to_str(), None, load_config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }
}

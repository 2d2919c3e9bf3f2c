//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{PkgCacheError, PkgCacheResult};
use console::style;
use std::path::PathBuf;

/// Execute the config command
pub fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> PkgCacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force)?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value)?,
    }

    Ok(())
}

fn show_config(config: &Config) -> PkgCacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn init_config(manager: &ConfigManager, force: bool) -> PkgCacheResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {}",
            style("!").yellow(),
            path.display()
        );
        println!("  {}", style("Use --force to overwrite").dim());
        return Ok(());
    }

    manager.save(&Config::default())?;
    println!(
        "{} Configuration initialized at {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> PkgCacheResult<()> {
    let mut config = config.clone();
    apply_value(&mut config, key, value)?;
    manager.save(&config)?;

    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}

/// Apply a dot-separated key to the configuration
fn apply_value(config: &mut Config, key: &str, value: &str) -> PkgCacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => {
            config.general.verbose = value.parse().map_err(|_| {
                PkgCacheError::User(format!("Invalid verbosity: {} (expected 0-255)", value))
            })?
        }
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(PkgCacheError::User(format!(
                    "Invalid log format: {} (expected text or json)",
                    value
                )))
            }
        },
        ["cache", "dir"] => config.cache.dir = optional_path(value),
        ["toolchain", "program"] => config.toolchain.program = value.to_string(),
        ["toolchain", "workdir"] => config.toolchain.workdir = optional_path(value),
        ["fingerprint", "tree_dir"] => config.fingerprint.tree_dir = optional_path(value),
        ["fingerprint", "tree_hash"] => config.fingerprint.tree_hash = optional_string(value),
        ["fingerprint", "toolchain_hash"] => {
            config.fingerprint.toolchain_hash = optional_string(value)
        }
        _ => return Err(PkgCacheError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

/// Empty values unset optional keys
fn optional_string(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_path(value: &str) -> Option<PathBuf> {
    optional_string(value).map(PathBuf::from)
}

//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::output::{print_error, print_info, print_success, print_warning};
use hl_core::config::{self, HiloConfig};

fn resolve_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(config::default_config_path)
}

/// Configuration as a TOML table: the file if present, defaults otherwise
fn current_table(path: &Path) -> Result<toml::Table> {
    if !path.exists() {
        let defaults = toml::to_string(&HiloConfig::default())?;
        return Ok(toml::from_str(&defaults)?);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}

/// Get a config value by key (e.g. `referee.time_limit`)
pub fn config_get(config_path: Option<&PathBuf>, key: &str) -> Result<()> {
    let path = resolve_path(config_path);
    let table = current_table(&path)?;

    let mut current = &toml::Value::Table(table);
    for part in key.split('.') {
        match current.as_table().and_then(|t| t.get(part)) {
            Some(v) => current = v,
            None => {
                print_error(&format!("Key not found: {}", key));
                return Ok(());
            }
        }
    }

    match current {
        toml::Value::String(s) => println!("{}", s),
        toml::Value::Table(_) => println!("{}", toml::to_string_pretty(current)?),
        other => println!("{}", other),
    }

    Ok(())
}

/// Set a config value by key
///
/// The updated file must still describe a valid configuration, otherwise
/// nothing is written.
pub fn config_set(config_path: Option<&PathBuf>, key: &str, value: &str) -> Result<()> {
    let path = resolve_path(config_path);
    let mut table = current_table(&path)?;

    let parts: Vec<&str> = key.split('.').collect();
    let (last_key, parents) = parts
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("Invalid key: key path cannot be empty"))?;

    let mut current = &mut table;
    for part in parents {
        current = current
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("Cannot navigate to key: {}", key))?;
    }

    let toml_value = if let Ok(b) = value.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else {
        toml::Value::String(value.to_string())
    };
    current.insert(last_key.to_string(), toml_value);

    let new_content = toml::to_string_pretty(&table)?;
    let updated: HiloConfig =
        toml::from_str(&new_content).with_context(|| format!("Invalid value for {}", key))?;
    updated.validate()?;

    config::save_config(&path, &updated)?;
    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Show current configuration
pub fn config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let path = resolve_path(config_path);

    if !path.exists() {
        print_warning(&format!("No configuration file found at {:?}", path));
        print_info("Showing defaults. Run 'hilo config init' to create a file");
        println!("{}", toml::to_string_pretty(&HiloConfig::default())?);
        return Ok(());
    }

    print_info(&format!("Configuration file: {:?}", path));
    println!();

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    println!("{}", content);

    Ok(())
}

/// Write the default configuration file
pub fn config_init(config_path: Option<&PathBuf>, force: bool) -> Result<()> {
    let path = resolve_path(config_path);

    if path.exists() && !force {
        print_error(&format!("Config file already exists: {:?}", path));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    config::save_config(&path, &HiloConfig::default())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    print_success(&format!("Created configuration file: {:?}", path));

    Ok(())
}

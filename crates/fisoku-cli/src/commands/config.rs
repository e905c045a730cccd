//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use fisoku_core::models::config::FisokuConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "extraction.min_total_amount")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a bare string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fisoku")
        .join("config.json")
}

/// Load the `-c` file if given, else the default file if it exists, else defaults.
pub fn load(config_path: Option<&str>) -> anyhow::Result<FisokuConfig> {
    if let Some(path) = config_path {
        return Ok(FisokuConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(FisokuConfig::from_file(&path)?)
    } else {
        Ok(FisokuConfig::default())
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<FisokuConfig> {
    if path.exists() {
        Ok(FisokuConfig::from_file(path)?)
    } else {
        Ok(FisokuConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    FisokuConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    set_json_path(&mut json, key, parsed_value.clone())?;

    let config: FisokuConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn set_json_path(json: &mut serde_json::Value, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = json;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    let object = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
    if !object.contains_key(last) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(last.to_string(), value);

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'fisoku config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_nested_key() {
        let mut value = serde_json::to_value(FisokuConfig::default()).unwrap();
        set_json_path(&mut value, "ocr.language", json!("eng")).unwrap();
        let config: FisokuConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut value = serde_json::to_value(FisokuConfig::default()).unwrap();
        assert!(set_json_path(&mut value, "ocr.nope", json!(1)).is_err());
        assert!(set_json_path(&mut value, "missing.language", json!(1)).is_err());
    }

    #[test]
    fn test_set_and_reload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        set_config(&path, "extraction.company_scan_lines", "8").unwrap();
        assert_eq!(load_or_default(&path).unwrap().extraction.company_scan_lines, 8);
    }
}

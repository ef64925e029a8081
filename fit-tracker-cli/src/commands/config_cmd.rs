use anyhow::{anyhow, Context, Result};
use fit_tracker::Config;

use crate::session::Session;
use crate::ui;

pub async fn show_config(session: &Session) -> Result<()> {
    let mut shown = session.config.clone();
    if !shown.auth.token.is_empty() {
        shown.auth.token = "[REDACTED]".to_string();
    }
    if !shown.ai.api_key.is_empty() {
        shown.ai.api_key = "[REDACTED]".to_string();
    }
    let config_str = toml::to_string_pretty(&shown)?;

    ui::heading("Current Configuration");
    println!("File: {}", session.config_path().display());
    println!();
    println!("{}", config_str);

    Ok(())
}

pub async fn init_config(session: &Session, force: bool) -> Result<()> {
    let config_file = session.config_path();

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(config_file)?;

    ui::success(format!("Configuration initialized at: {}", config_file.display()));
    println!();
    println!("Set your Gemini key with: fit-tracker config set ai.api_key <KEY>");

    Ok(())
}

/// Set a dotted key such as `api.base_url` or `estimator.debounce_ms`
pub async fn set_config(session: &mut Session, key: &str, value: &str) -> Result<()> {
    session.config = with_value(&session.config, key, value)?;
    session.save_config()?;

    ui::success(format!("Set {}", key));
    Ok(())
}

fn with_value(config: &Config, key: &str, value: &str) -> Result<Config> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| anyhow!("Keys look like section.field, e.g. api.base_url"))?;

    let mut root = toml::Value::try_from(config)?;
    let table = root
        .get_mut(section)
        .and_then(toml::Value::as_table_mut)
        .ok_or_else(|| anyhow!("Unknown config section: {}", section))?;

    let current = table
        .get(field)
        .ok_or_else(|| anyhow!("Unknown config key: {}", key))?;

    let parsed = match current {
        toml::Value::Boolean(_) => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("{} expects true or false", key))?,
        ),
        toml::Value::Integer(_) => toml::Value::Integer(
            value
                .parse()
                .with_context(|| format!("{} expects a whole number", key))?,
        ),
        toml::Value::Float(_) => toml::Value::Float(
            value
                .parse()
                .with_context(|| format!("{} expects a number", key))?,
        ),
        _ => toml::Value::String(value.to_string()),
    };
    table.insert(field.to_string(), parsed);

    root.try_into().context("Invalid configuration value")
}

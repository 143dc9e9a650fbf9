//! Configuration management commands.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, LogFormat};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { tenant, force } => init_config(&tenant, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    if let Some(ref path) = ctx.config_path {
        ctx.output.kv("file", &path.display().to_string());
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("tenant_id", &ctx.config.api.tenant_id);
    ctx.output.kv(
        "token",
        if ctx.config.api.token.is_some() { "(set)" } else { "(none)" },
    );
    ctx.output.kv("timeout_ms", &ctx.config.api.timeout_ms.to_string());
    ctx.output.kv("max_retries", &ctx.config.api.max_retries.to_string());

    ctx.output.info("[storefront]");
    ctx.output.kv("currency", &ctx.config.storefront.currency);
    ctx.output.kv("page_size", &ctx.config.storefront.page_size.to_string());
    ctx.output.kv("state_dir", &ctx.state_dir().display().to_string());

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", format_name(ctx.config.logging.format));

    if !ctx.config.environments.is_empty() {
        ctx.output.info("Environments:");
        let mut names: Vec<&String> = ctx.config.environments.keys().collect();
        names.sort();
        for env in names {
            ctx.output.list_item(env);
        }
    }

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(ref config_path) = ctx.config_path else {
        bail!("No config file found. Run `playrent config init` to create one.");
    };

    // Edit the file as written so environment overrides stay out of it.
    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    save_config(&config, config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn init_config(tenant: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("playrent.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(tenant))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let errors = ctx.config.validate();
    let mut warnings = Vec::new();
    if ctx.config.api.token.is_none() {
        warnings.push("api.token is not set; cart, wishlist and admin calls will fail".to_string());
    }
    if ctx.config.api.base_url.starts_with("http://")
        && !ctx.config.api.base_url.contains("localhost")
    {
        warnings.push("api.base_url is not using https".to_string());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Human => "human",
        LogFormat::Json => "json",
    }
}

fn save_config(config: &CliConfig, path: &Path) -> Result<()> {
    let content = if path.extension().is_some_and(|e| e == "json") {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };
    fs::write(path, content)?;
    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["api", "tenant_id"] => Ok(config.api.tenant_id.clone()),
        ["api", "token"] => Ok(config.api.token.clone().unwrap_or_default()),
        ["api", "timeout_ms"] => Ok(config.api.timeout_ms.to_string()),
        ["api", "max_retries"] => Ok(config.api.max_retries.to_string()),
        ["storefront", "currency"] => Ok(config.storefront.currency.clone()),
        ["storefront", "page_size"] => Ok(config.storefront.page_size.to_string()),
        ["storefront", "state_dir"] => Ok(config.storefront.state_dir.clone()),
        ["logging", "level"] => Ok(config.logging.level.clone()),
        ["logging", "format"] => Ok(format_name(config.logging.format).to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "tenant_id"] => config.api.tenant_id = value.to_string(),
        ["api", "token"] => config.api.token = Some(value.to_string()),
        ["api", "timeout_ms"] => config.api.timeout_ms = value.parse()?,
        ["api", "max_retries"] => config.api.max_retries = value.parse()?,
        ["storefront", "currency"] => config.storefront.currency = value.to_uppercase(),
        ["storefront", "page_size"] => config.storefront.page_size = value.parse()?,
        ["storefront", "state_dir"] => config.storefront.state_dir = value.to_string(),
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => {
            config.logging.format = match value {
                "human" => LogFormat::Human,
                "json" => LogFormat::Json,
                other => bail!("Unknown log format: {}", other),
            }
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "api.max_retries", "5").unwrap();
        set_config_value(&mut config, "storefront.currency", "eur").unwrap();
        set_config_value(&mut config, "logging.format", "json").unwrap();

        assert_eq!(get_config_value(&config, "api.max_retries").unwrap(), "5");
        assert_eq!(get_config_value(&config, "storefront.currency").unwrap(), "EUR");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(set_config_value(&mut config, "api.max_retries", "many").is_err());
        assert!(get_config_value(&config, "api.nope").is_err());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playrent.toml");
        let mut config = CliConfig::default();
        config.api.token = Some("abc".to_string());

        save_config(&config, &path).unwrap();
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }
}

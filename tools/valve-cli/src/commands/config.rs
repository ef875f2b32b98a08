//! Configuration management commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use valve_site::config::default_toml;
use valve_site::{SiteConfig, SiteError};

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[site]");
    ctx.output.kv("name", &config.site.name);
    ctx.output.kv("url", &config.site.url);

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("resolved", &config.api_base());

    ctx.output.info("[contact]");
    ctx.output.kv("from_name", &config.contact.from_name);
    ctx.output.kv("from_address", &config.contact.from_address);
    ctx.output.kv("to_address", &config.contact.to_address);
    ctx.output.kv("subject_prefix", &config.contact.subject_prefix);

    ctx.output.info("[cors]");
    for origin in &config.cors.allowed_origins {
        ctx.output.list_item(origin);
    }
    ctx.output.kv(
        "allow_missing_origin",
        &config.cors.allow_missing_origin.to_string(),
    );
    ctx.output
        .kv("allow_credentials", &config.cors.allow_credentials.to_string());
    ctx.output
        .kv("max_age_secs", &config.cors.max_age_secs.to_string());

    ctx.output.info("[catalog]");
    ctx.output.kv(
        "data_path",
        config.catalog.data_path.as_deref().unwrap_or("(bundled)"),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &config.logging.format);

    if ctx.output.is_verbose() {
        let endpoints = config.endpoints();
        ctx.output.info("Endpoints:");
        ctx.output.list_item(&endpoints.categories());
        ctx.output.list_item(&endpoints.products(None));
        ctx.output.list_item(&endpoints.posts());
        ctx.output.list_item(&endpoints.contact());
    }

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => bail!("No config file found. Run `valve config init` to create one."),
    };

    // Reload without environment overrides so they are not persisted.
    let mut config = SiteConfig::load(&config_path)
        .with_context(|| format!("Failed to load config file: {}", config_path.display()))?;

    set_config_value(&mut config, key, value)?;

    config
        .save(&config_path)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Config file left unchanged");
            return Ok(());
        }
    }

    let content = default_toml(&ctx.config.site.name);
    tokio::fs::write(&config_path, content)
        .await
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let report = ctx.config.check();

    if ctx.output.is_json() {
        ctx.output.json(&report);
    }

    if report.errors.is_empty() && report.warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &report.errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &report.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !report.errors.is_empty() {
        return Err(SiteError::InvalidConfig(format!(
            "configuration has {} error(s)",
            report.errors.len()
        ))
        .into());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn get_config_value(config: &SiteConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["site", "name"] => config.site.name.clone(),
        ["site", "url"] => config.site.url.clone(),
        ["api", "base_url"] => config.api.base_url.clone(),
        ["contact", "from_name"] => config.contact.from_name.clone(),
        ["contact", "from_address"] => config.contact.from_address.clone(),
        ["contact", "to_address"] => config.contact.to_address.clone(),
        ["contact", "subject_prefix"] => config.contact.subject_prefix.clone(),
        ["cors", "allowed_origins"] => config.cors.allowed_origins.join(","),
        ["cors", "allow_missing_origin"] => config.cors.allow_missing_origin.to_string(),
        ["cors", "allow_credentials"] => config.cors.allow_credentials.to_string(),
        ["cors", "max_age_secs"] => config.cors.max_age_secs.to_string(),
        ["catalog", "data_path"] => config.catalog.data_path.clone().unwrap_or_default(),
        ["logging", "level"] => config.logging.level.clone(),
        ["logging", "format"] => config.logging.format.clone(),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut SiteConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["site", "name"] => config.site.name = value.to_string(),
        ["site", "url"] => config.site.url = value.trim_end_matches('/').to_string(),
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["contact", "from_name"] => config.contact.from_name = value.to_string(),
        ["contact", "from_address"] => config.contact.from_address = value.to_string(),
        ["contact", "to_address"] => config.contact.to_address = value.to_string(),
        ["contact", "subject_prefix"] => config.contact.subject_prefix = value.to_string(),
        ["cors", "allowed_origins"] => {
            config.cors.allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
        ["cors", "allow_missing_origin"] => config.cors.allow_missing_origin = value.parse()?,
        ["cors", "allow_credentials"] => config.cors.allow_credentials = value.parse()?,
        ["cors", "max_age_secs"] => config.cors.max_age_secs = value.parse()?,
        ["catalog", "data_path"] => {
            config.catalog.data_path = Some(value.to_string()).filter(|v| !v.is_empty())
        }
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => config.logging.format = value.to_string(),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_round() {
        let mut config = SiteConfig::default();
        set_config_value(&mut config, "cors.max_age_secs", "600").unwrap();
        set_config_value(&mut config, "site.url", "https://example.com/").unwrap();
        set_config_value(&mut config, "cors.allowed_origins", "https://a.com, https://b.com")
            .unwrap();

        assert_eq!(get_config_value(&config, "cors.max_age_secs").unwrap(), "600");
        assert_eq!(get_config_value(&config, "site.url").unwrap(), "https://example.com");
        assert_eq!(config.cors.allowed_origins, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_unknown_and_malformed_keys() {
        let mut config = SiteConfig::default();
        assert!(get_config_value(&config, "site").is_err());
        assert!(set_config_value(&mut config, "cors.max_age_secs", "soon").is_err());
        assert!(set_config_value(&mut config, "nope.key", "1").is_err());
    }
}

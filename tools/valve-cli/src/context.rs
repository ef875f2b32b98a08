//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use valve_catalog::repository::StaticCatalog;
use valve_observability::{LogLevel, StructuredLogger};
use valve_site::SiteConfig;

use crate::output::Output;

/// Config file names searched from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["valve.toml", ".valve.toml", "valve.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Site configuration with environment overrides applied.
    pub config: SiteConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Catalog file given with `--data`.
    data: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, data: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let config = SiteConfig::load(path)
                    .with_context(|| format!("Failed to load config file: {}", path))?;
                (config, Some(PathBuf::from(path)))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => {
                    let config = SiteConfig::load(&path)
                        .with_context(|| format!("Failed to load config file: {}", path.display()))?;
                    (config, Some(path))
                }
                None => (SiteConfig::default(), None),
            },
        };

        for name in config.apply_env() {
            output.debug(&format!("{} overrides config", name));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            data,
        })
    }

    /// Find the nearest config file in the directory tree.
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }

    /// Logger for one command.
    ///
    /// Below `warn` only in verbose mode, so logs never crowd normal output.
    pub fn logger(&self, operation: &str) -> StructuredLogger {
        let logger = self
            .config
            .logging
            .logger("valve-cli")
            .with_operation(operation);
        if self.output.is_verbose() {
            logger
        } else {
            let level = logger.min_level().max(LogLevel::Warn);
            logger.with_min_level(level)
        }
    }

    /// Load the catalog: `--data`, then `catalog.data_path`, then the bundled seed.
    pub async fn load_catalog(&self) -> Result<StaticCatalog> {
        let source = self
            .data
            .as_deref()
            .or(self.config.catalog.data_path.as_deref());

        let Some(source) = source else {
            self.output.debug("Using bundled catalog");
            return Ok(StaticCatalog::seed());
        };

        let path = self.resolve_path(source);
        let spinner = self
            .output
            .spinner(&format!("Loading catalog from {}", path.display()));
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read catalog file: {}", path.display()));
        spinner.finish_and_clear();

        let catalog = StaticCatalog::from_json_str(&content?)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

        self.logger("load_catalog")
            .debug_builder("catalog loaded")
            .field("path", path.display().to_string())
            .field_usize("categories", catalog.categories().len())
            .field_usize("products", catalog.product_count())
            .emit();

        Ok(catalog)
    }
}

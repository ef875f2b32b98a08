//! Site configuration.
//!
//! Loaded from TOML or JSON (by file extension). Every field has a default,
//! so an empty file is a valid configuration. Environment variables
//! override file values after loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use valve_observability::{LogFormat, LogLevel, RequestId, StructuredLogger};

use crate::error::{SiteError, SiteResult};

/// Site configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Public site identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Canonical base URL, without trailing slash.
    #[serde(default = "default_site_url")]
    pub url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
        }
    }
}

fn default_site_name() -> String {
    "Nexus Válvulas".to_string()
}

fn default_site_url() -> String {
    "https://nexusvalvulas.com.br".to_string()
}

/// Backend REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend origin; `/api` is appended when missing.
    #[serde(default = "default_api_base")]
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}

/// Contact form mail composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Display name on outgoing mail.
    #[serde(default = "default_site_name")]
    pub from_name: String,

    /// Sending mailbox.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Mailbox that receives contact messages.
    #[serde(default = "default_to_address")]
    pub to_address: String,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            from_name: default_site_name(),
            from_address: default_from_address(),
            to_address: default_to_address(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

fn default_from_address() -> String {
    "site@nexusvalvulas.com.br".to_string()
}

fn default_to_address() -> String {
    "nexus@nexusvalvulas.com.br".to_string()
}

fn default_subject_prefix() -> String {
    "Nova mensagem de contato".to_string()
}

/// Cross-origin policy for the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins or `https://*.domain` patterns.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Allow requests that carry no `Origin` header (server-to-server, curl).
    #[serde(default = "default_true")]
    pub allow_missing_origin: bool,

    #[serde(default = "default_true")]
    pub allow_credentials: bool,

    /// Preflight cache lifetime.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_missing_origin: true,
            allow_credentials: true,
            max_age_secs: default_max_age(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost",
        "http://localhost:3000",
        "http://localhost:80",
        "https://nexusvalvulas.com.br",
        "https://www.nexusvalvulas.com.br",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_max_age() -> u64 {
    1_728_000
}

/// Catalog data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// JSON export to load instead of the bundled catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

/// Structured log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json or human.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl LoggingSection {
    /// Parsed level, falling back to `Info` for unknown names.
    pub fn level(&self) -> LogLevel {
        self.level.parse().unwrap_or(LogLevel::Info)
    }

    pub fn format(&self) -> LogFormat {
        self.format.parse().unwrap_or(LogFormat::Human)
    }

    /// Logger for one operation, configured from this section.
    pub fn logger(&self, component: &str) -> StructuredLogger {
        StructuredLogger::new(RequestId::generate())
            .with_component(component)
            .with_min_level(self.level())
            .with_format(self.format())
    }
}

/// Problems found by [`SiteConfig::check`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SiteConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> SiteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, is_json(path)).map_err(|message| SiteError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse config text; `json` selects the format.
    pub fn parse(content: &str, json: bool) -> Result<Self, String> {
        if json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        }
    }

    /// Save config to a file in the format its extension names.
    pub fn save(&self, path: impl AsRef<Path>) -> SiteResult<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self).map_err(|e| SiteError::Serialization(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|source| SiteError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Vec<&'static str> {
        self.apply_overrides(std::env::vars())
    }

    /// Apply `NAME=value` overrides; returns the names that were applied.
    ///
    /// Recognized: `SITE_URL`, `API_BASE`, `CONTACT_EMAIL`, `SMTP_USER`,
    /// `CATALOG_PATH`, `CORS_ALLOWED_ORIGINS` (comma-separated), `LOG_LEVEL`.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Vec<&'static str>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut applied = Vec::new();
        for (key, value) in vars {
            let value: String = value.into();
            let name = match key.as_ref() {
                "SITE_URL" => {
                    self.site.url = value.trim_end_matches('/').to_string();
                    "SITE_URL"
                }
                "API_BASE" => {
                    self.api.base_url = value;
                    "API_BASE"
                }
                "CONTACT_EMAIL" => {
                    self.contact.to_address = value;
                    "CONTACT_EMAIL"
                }
                "SMTP_USER" => {
                    self.contact.from_address = value;
                    "SMTP_USER"
                }
                "CATALOG_PATH" => {
                    self.catalog.data_path = Some(value).filter(|v| !v.is_empty());
                    "CATALOG_PATH"
                }
                "CORS_ALLOWED_ORIGINS" => {
                    self.cors.allowed_origins = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    "CORS_ALLOWED_ORIGINS"
                }
                "LOG_LEVEL" => {
                    self.logging.level = value;
                    "LOG_LEVEL"
                }
                _ => continue,
            };
            applied.push(name);
        }
        applied
    }

    /// API root including the `/api` prefix, without trailing slash.
    pub fn api_base(&self) -> String {
        let base = self.api.base_url.trim_end_matches('/');
        if base.ends_with("/api") {
            base.to_string()
        } else {
            format!("{}/api", base)
        }
    }

    /// Backend endpoint URLs used by the storefront.
    pub fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints {
            base: self.api_base(),
        }
    }

    /// Validate values that serde cannot.
    pub fn check(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        if !is_http_url(&self.site.url) {
            report
                .errors
                .push(format!("site.url '{}' must be an http(s) URL", self.site.url));
        } else if self.site.url.ends_with('/') {
            report
                .warnings
                .push("site.url should not end with '/'".to_string());
        }

        if !is_http_url(&self.api.base_url) {
            report.errors.push(format!(
                "api.base_url '{}' must be an http(s) URL",
                self.api.base_url
            ));
        }

        for (key, address) in [
            ("contact.from_address", &self.contact.from_address),
            ("contact.to_address", &self.contact.to_address),
        ] {
            if !crate::contact::looks_like_email(address) {
                report
                    .errors
                    .push(format!("{} '{}' is not an e-mail address", key, address));
            }
        }

        for (i, origin) in self.cors.allowed_origins.iter().enumerate() {
            if !is_http_url(origin) {
                report.errors.push(format!(
                    "cors.allowed_origins[{}] '{}' must be an http(s) origin",
                    i, origin
                ));
            }
        }
        if self.cors.allowed_origins.is_empty() {
            report
                .warnings
                .push("cors.allowed_origins is empty; only origin-less requests pass".to_string());
        }

        if self.logging.level.parse::<LogLevel>().is_err() {
            report
                .warnings
                .push(format!("logging.level '{}' is unknown; using info", self.logging.level));
        }

        report
    }
}

/// REST endpoint builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    pub fn categories(&self) -> String {
        format!("{}/products/categories/", self.base)
    }

    pub fn products(&self, category_slug: Option<&str>) -> String {
        match category_slug {
            Some(slug) => format!("{}/products/products/?category={}", self.base, slug),
            None => format!("{}/products/products/", self.base),
        }
    }

    pub fn product(&self, slug: &str) -> String {
        format!("{}/products/products/{}/", self.base, slug)
    }

    pub fn posts(&self) -> String {
        format!("{}/blog/posts/", self.base)
    }

    pub fn post(&self, slug: &str) -> String {
        format!("{}/blog/posts/{}/", self.base, slug)
    }

    pub fn contact(&self) -> String {
        format!("{}/contact", self.base)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

/// Template written by `valve config init`.
pub fn default_toml(site_name: &str) -> String {
    format!(
        r#"# Valve catalog site configuration

[site]
name = "{site_name}"
url = "https://nexusvalvulas.com.br"

[api]
# "/api" is appended when missing
base_url = "http://localhost:8000"

[contact]
from_name = "{site_name}"
from_address = "site@nexusvalvulas.com.br"
to_address = "nexus@nexusvalvulas.com.br"
subject_prefix = "Nova mensagem de contato"

[cors]
allowed_origins = [
    "http://localhost",
    "http://localhost:3000",
    "http://localhost:80",
    "https://nexusvalvulas.com.br",
    "https://www.nexusvalvulas.com.br",
]
allow_missing_origin = true
allow_credentials = true
max_age_secs = 1728000

[catalog]
# data_path = "catalog.json"

[logging]
level = "info"
format = "human"
"#,
        site_name = site_name.replace('"', "\\\"")
    )
}

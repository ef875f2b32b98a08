//! Structured logging with operation context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::context::RequestId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A level or format name that could not be parsed.
#[derive(Debug, Clone, Error)]
#[error("unknown log setting: {0}")]
pub struct ParseLogError(String);

impl FromStr for LogLevel {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ParseLogError(other.to_string())),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Request ID for correlation.
    pub request_id: String,
    /// Emitting component (e.g. `catalog`, `sitemap`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Operation within the component (e.g. `load`, `render`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(ref component) = self.component {
            s = format!("[{}] {}: {}", self.level, component, self.message);
        }

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(text) => format!("{}={}", k, text),
                    other => format!("{}={}", k, other),
                })
                .collect();
            s.push_str(" | ");
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable format (for terminals).
    Human,
}

impl FromStr for LogFormat {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" | "pretty" => Ok(Self::Human),
            other => Err(ParseLogError(other.to_string())),
        }
    }
}

/// Where entries go.
#[derive(Debug, Clone, Default)]
enum LogSink {
    #[default]
    Stderr,
    Buffer(Arc<Mutex<Vec<LogEntry>>>),
}

/// Structured logger with operation context.
///
/// Every entry carries the request id, component and operation it was
/// created with, plus the time elapsed since creation.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    request_id: RequestId,
    component: Option<String>,
    operation: Option<String>,
    start_time: Instant,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl StructuredLogger {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            component: None,
            operation: None,
            start_time: Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: LogSink::Stderr,
        }
    }

    /// A logger that keeps entries in memory instead of printing them.
    ///
    /// Entries can be read back with [`Self::captured`].
    pub fn capturing(request_id: RequestId) -> Self {
        Self {
            sink: LogSink::Buffer(Arc::new(Mutex::new(Vec::new()))),
            ..Self::new(request_id)
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// A logger for a sub-operation sharing this logger's id, clock and sink.
    pub fn child(&self, operation: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.operation = Some(operation.into());
        child
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            request_id: self.request_id.to_string(),
            component: self.component.clone(),
            operation: self.operation.clone(),
            fields,
            elapsed_us: Some(self.elapsed_us()),
        };

        match &self.sink {
            LogSink::Stderr => {
                let output = match self.format {
                    LogFormat::Json => entry.to_json(),
                    LogFormat::Human => entry.to_human(),
                };
                eprintln!("{}", output);
            }
            LogSink::Buffer(buffer) => {
                if let Ok(mut entries) = buffer.lock() {
                    entries.push(entry);
                }
            }
        }
    }

    /// Entries recorded by a capturing logger (empty for stderr loggers).
    pub fn captured(&self) -> Vec<LogEntry> {
        match &self.sink {
            LogSink::Buffer(buffer) => buffer.lock().map(|entries| entries.to_vec()).unwrap_or_default(),
            LogSink::Stderr => Vec::new(),
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }
}

/// Top-level keys of a serialized [`LogEntry`].
const RESERVED_KEYS: &[&str] = &[
    "level",
    "message",
    "request_id",
    "component",
    "operation",
    "elapsed_us",
];

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, serde_json::json!(value.into()))
    }

    /// Add an optional string field; `None` is recorded as null.
    pub fn field_opt(self, key: &str, value: Option<&str>) -> Self {
        self.insert(key, serde_json::json!(value))
    }

    pub fn field_i64(self, key: &str, value: i64) -> Self {
        self.insert(key, serde_json::json!(value))
    }

    pub fn field_usize(self, key: &str, value: usize) -> Self {
        self.insert(key, serde_json::json!(value))
    }

    pub fn field_bool(self, key: &str, value: bool) -> Self {
        self.insert(key, serde_json::json!(value))
    }

    /// Keys that collide with an entry's own keys get a `field_` prefix.
    fn insert(mut self, key: &str, value: serde_json::Value) -> Self {
        let key = if RESERVED_KEYS.contains(&key) {
            format!("field_{}", key)
        } else {
            key.to_string()
        };
        self.fields.insert(key, value);
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger() -> StructuredLogger {
        StructuredLogger::capturing(RequestId::from_string("req-1")).with_component("catalog")
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[test]
    fn test_min_level_filters() {
        let log = logger();
        log.debug("hidden");
        log.info("shown");
        log.error("also shown");

        let entries = log.captured();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "shown");
        assert_eq!(entries[1].level, LogLevel::Error);
    }

    #[test]
    fn test_builder_fields_and_context() {
        let log = logger().with_min_level(LogLevel::Debug);
        let child = log.child("load");
        child
            .debug_builder("catalog loaded")
            .field("source", "seed")
            .field_usize("products", 5)
            .field_bool("valid", true)
            .field_opt("path", None)
            .emit();

        let entries = log.captured();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.operation.as_deref(), Some("load"));
        assert_eq!(entry.fields["products"], serde_json::json!(5));

        let json: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(json["request_id"], "req-1");
        assert_eq!(json["component"], "catalog");
        assert_eq!(json["source"], "seed");
        assert_eq!(json["level"], "debug");
        assert!(json["path"].is_null());
    }

    #[test]
    fn test_reserved_field_names_are_prefixed() {
        let log = logger();
        log.info_builder("sitemap generated")
            .field("level", "catalog")
            .field("message", "user text")
            .field_i64("lastmod_offset_days", -2)
            .emit();

        let entries = log.captured();
        let json = entries[0].to_json();
        assert_eq!(json.matches("\"level\"").count(), 1);
        assert_eq!(json.matches("\"message\"").count(), 1);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["message"], "sitemap generated");
        assert_eq!(value["field_level"], "catalog");
        assert_eq!(value["field_message"], "user text");
        assert_eq!(value["lastmod_offset_days"], -2);
    }

    #[test]
    fn test_human_format() {
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "slow".to_string(),
            request_id: "r".to_string(),
            component: Some("sitemap".to_string()),
            operation: None,
            fields: BTreeMap::from([("urls".to_string(), serde_json::json!(12))]),
            elapsed_us: None,
        };
        assert_eq!(entry.to_human(), "[WARN] sitemap: slow | urls=12");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }
}

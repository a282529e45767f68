//! Configuration sections.

use kanon_core::{MissingSchemaBehavior, ObjectMode};
use kanon_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Process-wide validation defaults.
///
/// Both values are read when a middleware is built, so they belong in
/// startup configuration rather than in per-request state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ValidationSettings {
    /// Strictness applied to field mappings (`"strict"` or `"lax"`).
    #[serde(default)]
    pub default_schema_object: ObjectMode,

    /// What segments without a schema accept (`"strict"` or `"any"`).
    #[serde(default)]
    pub missing_schema_behavior: MissingSchemaBehavior,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingSettings {
    /// Converts these settings into a subscriber configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            file_line_info: self.include_location,
            ..base
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

//! Configuration for the checker
//!
//! Values are resolved from defaults, then an optional YAML file, then
//! `FEDERA_*` environment variables. Command-line flags are applied last by
//! the binary.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_ENV: &str = "FEDERA_CONFIG";

/// How reports are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit logs as JSON lines instead of plain text
    #[serde(default)]
    pub log_json: bool,

    /// Stop at the first invalid document
    #[serde(default)]
    pub fail_fast: bool,

    /// Report format
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_log_filter() -> String {
    "warn,federa_templates=info".to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_json: false,
            fail_fast: false,
            output_format: OutputFormat::default(),
        }
    }
}

impl CheckConfig {
    /// Load configuration from the file named by `FEDERA_CONFIG` (if any) and
    /// the environment
    pub fn load() -> CliResult<Self> {
        let config_file = env::var(CONFIG_FILE_ENV).ok();
        Self::load_from(config_file.as_deref().map(Path::new))
    }

    /// Load configuration from an explicit file (if any) and the environment
    pub fn load_from(config_file: Option<&Path>) -> CliResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.apply_env_overrides_from(|key| env::var(key).ok()))
    }

    /// Read a YAML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: CheckConfig = serde_yaml::from_str(&contents).map_err(|source| CliError::ConfigError {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Apply `FEDERA_*` overrides read through `lookup`. Unparsable values
    /// are logged and ignored.
    pub fn apply_env_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup("FEDERA_LOG_FILTER") {
            self.log_filter = filter;
        }

        if let Some(log_json) = lookup("FEDERA_LOG_JSON") {
            match parse_flag(&log_json) {
                Some(enabled) => self.log_json = enabled,
                None => warn!("Invalid FEDERA_LOG_JSON value: {}", log_json),
            }
        }

        if let Some(fail_fast) = lookup("FEDERA_FAIL_FAST") {
            match parse_flag(&fail_fast) {
                Some(enabled) => self.fail_fast = enabled,
                None => warn!("Invalid FEDERA_FAIL_FAST value: {}", fail_fast),
            }
        }

        if let Some(format) = lookup("FEDERA_OUTPUT_FORMAT") {
            match OutputFormat::parse(&format) {
                Some(format) => self.output_format = format,
                None => warn!("Invalid FEDERA_OUTPUT_FORMAT value: {}", format),
            }
        }

        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

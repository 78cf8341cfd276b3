//! Error types for the checker
//!
//! Document validation failures are not errors here: they end up in the
//! report. These are the failures that stop the checker itself.

use thiserror::Error;

/// Checker error types
#[derive(Error, Debug)]
pub enum CliError {
    /// A document or configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for `CheckConfig`
    #[error("Configuration error in {path}: {source}")]
    ConfigError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON report rendering error
    #[error("Failed to render report: {0}")]
    RenderError(#[from] serde_json::Error),
}

/// Result type for checker operations
pub type CliResult<T> = Result<T, CliError>;

//! # Federa CLI
//!
//! Library side of the `federa-check` binary: configuration loading,
//! logging setup, and checking process documents into reports.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod report;

pub use config::{CheckConfig, OutputFormat};
pub use error::{CliError, CliResult};
pub use report::{render, FileReport};

use federa_templates::parse_and_validate_process_document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Check a document already in memory
pub fn check_document(file: impl Into<String>, yaml: &str) -> FileReport {
    FileReport::from_result(file, parse_and_validate_process_document(yaml))
}

/// Read and check a document from disk
pub fn check_file(path: &Path) -> CliResult<FileReport> {
    let yaml = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(check_document(path.display().to_string(), &yaml))
}

/// Check every file in order. With `fail_fast` set, stops after the first
/// invalid document.
pub fn run(config: &CheckConfig, files: &[PathBuf]) -> CliResult<Vec<FileReport>> {
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let report = check_file(path)?;
        if report.valid {
            info!(file = %report.file, processes = report.processes.len(), "document valid");
        } else {
            warn!(file = %report.file, errors = report.errors.len(), "document invalid");
        }

        let stop = !report.valid && config.fail_fast;
        reports.push(report);
        if stop {
            warn!("stopping at first invalid document");
            break;
        }
    }

    Ok(reports)
}

/// Returns a version string for the Federa CLI crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

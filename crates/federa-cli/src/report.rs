//! Per-file validation reports and their text/JSON rendering

use federa_templates::document::{ProcessKind, ValidatedProcess};
use federa_templates::DocumentError;
use serde::Serialize;
use std::fmt::Write;

use crate::config::OutputFormat;
use crate::error::CliResult;

/// Outcome of checking one process document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub valid: bool,
    pub processes: Vec<ProcessSummary>,
    pub errors: Vec<ErrorEntry>,
}

/// A process that passed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub name: String,
    pub kind: ProcessKind,
    pub state_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub code: String,
    pub message: String,
}

impl FileReport {
    pub fn from_result(file: impl Into<String>, result: Result<Vec<ValidatedProcess>, DocumentError>) -> Self {
        let file = file.into();
        match result {
            Ok(processes) => FileReport {
                file,
                valid: true,
                processes: processes.iter().map(ProcessSummary::from).collect(),
                errors: Vec::new(),
            },
            Err(err) => FileReport {
                file,
                valid: false,
                processes: Vec::new(),
                errors: err
                    .errors()
                    .into_iter()
                    .map(|e| ErrorEntry {
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    })
                    .collect(),
            },
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.valid {
            let _ = writeln!(out, "{}: ok ({} processes)", self.file, self.processes.len());
            for process in &self.processes {
                let _ = writeln!(
                    out,
                    "  ok {} ({}) state: {}",
                    process.name, process.kind, process.state_type
                );
            }
        } else {
            let _ = writeln!(out, "{}: FAILED ({} errors)", self.file, self.errors.len());
            for error in &self.errors {
                // Keep multi-line messages under their error line
                let message = error.message.replace('\n', "\n      ");
                let _ = writeln!(out, "  error[{}] {}", error.code, message);
            }
        }
        out
    }
}

impl From<&ValidatedProcess> for ProcessSummary {
    fn from(validated: &ValidatedProcess) -> Self {
        ProcessSummary {
            name: validated.name.clone(),
            kind: validated.process.kind(),
            state_type: validated.process.state_type().to_string(),
            description: validated.description.clone(),
        }
    }
}

/// Render every report in the requested format
pub fn render(reports: &[FileReport], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(reports.iter().map(FileReport::render_text).collect()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
    }
}

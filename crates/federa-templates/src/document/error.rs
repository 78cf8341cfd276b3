use std::fmt;
use thiserror::Error;

use crate::error::{SignatureError, TemplateError};

/// All possible errors that can occur while loading a process document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Unsupported document version
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(String),

    /// Two processes share a name
    #[error("Duplicate process name: '{0}' - process names must be unique within a document")]
    DuplicateProcess(String),

    /// Process name with characters outside `[A-Za-z0-9_-]`
    #[error("Invalid process name: '{0}' - names may only contain letters, digits, '_' and '-'")]
    InvalidName(String),

    /// A computation signature that does not parse to a function type
    #[error("Process '{process}': invalid `{computation}` signature: {source}")]
    Signature {
        /// Name of the process declaring the computation
        process: String,
        /// Which computation (`initialize_fn` or `next_fn`)
        computation: &'static str,
        /// The underlying signature error
        #[source]
        source: SignatureError,
    },

    /// The computations parse but violate the process template
    #[error("Process '{process}': {source}")]
    Template {
        /// Name of the rejected process
        process: String,
        /// The template error
        #[source]
        source: TemplateError,
    },

    /// Multiple errors
    #[error("{}", MultipleErrorsFormat(.0))]
    MultipleErrors(Vec<DocumentError>),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

// Helper struct to format multiple errors
struct MultipleErrorsFormat<'a>(&'a [DocumentError]);

impl fmt::Display for MultipleErrorsFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multiple document errors ({} issues):", self.0.len())?;
        for (i, err) in self.0.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, err)?;
        }
        Ok(())
    }
}

impl DocumentError {
    /// Create a DocumentError from a vector of errors, unwrapping a single one
    pub fn from_errors(mut errors: Vec<DocumentError>) -> Self {
        match errors.len() {
            0 => DocumentError::InternalError("Called from_errors with empty vector".to_string()),
            1 => errors.remove(0),
            _ => DocumentError::MultipleErrors(errors),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DocumentError::YamlError(_) => "ERR_DOC_YAML_PARSE",
            DocumentError::UnsupportedVersion(_) => "ERR_DOC_UNSUPPORTED_VERSION",
            DocumentError::DuplicateProcess(_) => "ERR_DOC_DUPLICATE_PROCESS",
            DocumentError::InvalidName(_) => "ERR_DOC_INVALID_NAME",
            DocumentError::Signature { source, .. } => source.error_code(),
            DocumentError::Template { source, .. } => source.error_code(),
            DocumentError::MultipleErrors(_) => "ERR_DOC_MULTIPLE",
            DocumentError::InternalError(_) => "ERR_DOC_INTERNAL",
        }
    }

    /// Flatten into the individual errors this one stands for
    pub fn errors(&self) -> Vec<&DocumentError> {
        match self {
            DocumentError::MultipleErrors(errors) => errors.iter().flat_map(DocumentError::errors).collect(),
            other => vec![other],
        }
    }
}

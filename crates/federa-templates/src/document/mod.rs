//! YAML process documents.
//!
//! A document declares named processes, each with a template kind and the
//! type signatures of its two computations:
//!
//! ```yaml
//! version: "1.0"
//! processes:
//!   - name: round-counter
//!     kind: iterative
//!     initialize_fn:
//!       name: init
//!       type_signature: "( -> int32@SERVER)"
//!     next_fn:
//!       name: next
//!       type_signature: "(int32@SERVER -> int32@SERVER)"
//! ```

mod definition;
mod error;
mod parser;

pub use definition::{ComputationDefinition, ProcessDefinition, ProcessDocument, ProcessKind};
pub use error::DocumentError;
pub use parser::{parse_process_document, SUPPORTED_VERSION};

use federa_types::ComputationType;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::computation::{ComputationRef, TypedComputation};
use crate::finalizer::FinalizerProcess;
use crate::iterative::IterativeProcess;
use crate::measured::MeasuredProcess;
use crate::process::StatefulProcess;

lazy_static! {
    static ref PROCESS_NAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9_\-]+$").expect("process name pattern is a valid regex");
}

/// A process built from a document, by template kind
#[derive(Debug, Clone)]
pub enum BuiltProcess {
    Iterative(IterativeProcess),
    Measured(MeasuredProcess),
    Finalizer(FinalizerProcess),
}

impl BuiltProcess {
    pub fn kind(&self) -> ProcessKind {
        match self {
            BuiltProcess::Iterative(_) => ProcessKind::Iterative,
            BuiltProcess::Measured(_) => ProcessKind::Measured,
            BuiltProcess::Finalizer(_) => ProcessKind::Finalizer,
        }
    }

    /// View through the interface shared by every template
    pub fn as_stateful(&self) -> &dyn StatefulProcess {
        match self {
            BuiltProcess::Iterative(p) => p,
            BuiltProcess::Measured(p) => p,
            BuiltProcess::Finalizer(p) => p,
        }
    }

    pub fn state_type(&self) -> &ComputationType {
        self.as_stateful().state_type()
    }
}

/// A validated process together with the name it was declared under
#[derive(Debug, Clone)]
pub struct ValidatedProcess {
    pub name: String,
    pub description: Option<String>,
    pub process: BuiltProcess,
}

/// Parse and validate a process document.
///
/// 1. Parses the YAML and checks the version
/// 2. Checks process names are well-formed and unique
/// 3. Builds every process with its template
///
/// Steps 2 and 3 collect every failure instead of stopping at the first; a
/// single failure is returned as is, several as `MultipleErrors`.
///
/// ```
/// use federa_templates::document::{parse_and_validate_process_document, ProcessKind};
///
/// let yaml = r#"
/// version: "1.0"
/// processes:
///   - name: round-counter
///     kind: iterative
///     initialize_fn: { name: init, type_signature: "( -> int32@SERVER)" }
///     next_fn: { name: next, type_signature: "(int32@SERVER -> int32@SERVER)" }
/// "#;
///
/// let processes = parse_and_validate_process_document(yaml).unwrap();
/// assert_eq!(processes[0].process.kind(), ProcessKind::Iterative);
/// ```
pub fn parse_and_validate_process_document(yaml_str: &str) -> Result<Vec<ValidatedProcess>, DocumentError> {
    let document = parse_process_document(yaml_str)?;
    build_document(&document)
}

/// Validate names and build every process of an already parsed document
pub fn build_document(document: &ProcessDocument) -> Result<Vec<ValidatedProcess>, DocumentError> {
    let mut errors = validate_names(document);
    let mut built = Vec::with_capacity(document.processes.len());

    for definition in &document.processes {
        match build_process(definition) {
            Ok(process) => built.push(ValidatedProcess {
                name: definition.name.clone(),
                description: definition.description.clone(),
                process,
            }),
            Err(err) => {
                warn!(process = %definition.name, code = err.error_code(), "process rejected");
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        return Err(DocumentError::from_errors(errors));
    }

    info!(processes = built.len(), "process document validated");
    Ok(built)
}

fn validate_names(document: &ProcessDocument) -> Vec<DocumentError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::with_capacity(document.processes.len());
    let mut duplicates = Vec::new();

    for definition in &document.processes {
        if !PROCESS_NAME_REGEX.is_match(&definition.name) {
            errors.push(DocumentError::InvalidName(definition.name.clone()));
        }
        if !seen.insert(definition.name.as_str()) && !duplicates.contains(&definition.name.as_str()) {
            duplicates.push(definition.name.as_str());
        }
    }

    errors.extend(
        duplicates
            .into_iter()
            .map(|name| DocumentError::DuplicateProcess(name.to_string())),
    );
    errors
}

/// Build one declared process with the template its kind names
pub fn build_process(definition: &ProcessDefinition) -> Result<BuiltProcess, DocumentError> {
    debug!(process = %definition.name, kind = %definition.kind, "building process");

    let initialize_fn = computation(definition, "initialize_fn", &definition.initialize_fn)?;
    let next_fn = computation(definition, "next_fn", &definition.next_fn)?;

    let built = match definition.kind {
        ProcessKind::Iterative if definition.multi_arg => {
            IterativeProcess::new_multi_arg(initialize_fn, next_fn).map(BuiltProcess::Iterative)
        }
        ProcessKind::Iterative => IterativeProcess::new(initialize_fn, next_fn).map(BuiltProcess::Iterative),
        ProcessKind::Measured if definition.multi_arg => {
            MeasuredProcess::new_multi_arg(initialize_fn, next_fn).map(BuiltProcess::Measured)
        }
        ProcessKind::Measured => MeasuredProcess::new(initialize_fn, next_fn).map(BuiltProcess::Measured),
        ProcessKind::Finalizer => FinalizerProcess::new(initialize_fn, next_fn).map(BuiltProcess::Finalizer),
    };

    built.map_err(|source| DocumentError::Template {
        process: definition.name.clone(),
        source,
    })
}

fn computation(
    definition: &ProcessDefinition,
    role: &'static str,
    declared: &ComputationDefinition,
) -> Result<ComputationRef, DocumentError> {
    TypedComputation::parse(declared.name.clone(), &declared.type_signature)
        .map(TypedComputation::into_ref)
        .map_err(|source| DocumentError::Signature {
            process: definition.name.clone(),
            computation: role,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn definition(name: &str, kind: ProcessKind, init: &str, next: &str) -> ProcessDefinition {
        ProcessDefinition {
            name: name.to_string(),
            kind,
            description: None,
            multi_arg: false,
            initialize_fn: ComputationDefinition {
                name: "init".to_string(),
                type_signature: init.to_string(),
            },
            next_fn: ComputationDefinition {
                name: "next".to_string(),
                type_signature: next.to_string(),
            },
            metadata: HashMap::new(),
        }
    }

    fn document(processes: Vec<ProcessDefinition>) -> ProcessDocument {
        ProcessDocument {
            version: SUPPORTED_VERSION.to_string(),
            processes,
        }
    }

    fn counter(name: &str) -> ProcessDefinition {
        definition(
            name,
            ProcessKind::Iterative,
            "( -> int32@SERVER)",
            "(int32@SERVER -> int32@SERVER)",
        )
    }

    #[test]
    fn test_validate_names() {
        let errors = validate_names(&document(vec![counter("a"), counter("b")]));
        assert!(errors.is_empty());

        let errors = validate_names(&document(vec![counter("a"), counter("a"), counter("a")]));
        assert_eq!(errors.len(), 1, "a name repeated three times is one duplicate");
        assert!(matches!(&errors[0], DocumentError::DuplicateProcess(name) if name == "a"));

        let errors = validate_names(&document(vec![counter("has space")]));
        assert!(matches!(&errors[0], DocumentError::InvalidName(_)));
    }

    #[test]
    fn test_build_process_by_kind() {
        let built = build_process(&counter("c")).unwrap();
        assert_eq!(built.kind(), ProcessKind::Iterative);
        assert_eq!(built.state_type().to_string(), "int32@SERVER");

        let mut multi = definition(
            "m",
            ProcessKind::Measured,
            "( -> int32@SERVER)",
            "(<int32@SERVER,{float32}@CLIENTS> -> <state=int32@SERVER,result=float32@SERVER,measurements=<>@SERVER>)",
        );
        multi.multi_arg = true;
        assert_eq!(build_process(&multi).unwrap().kind(), ProcessKind::Measured);

        multi.multi_arg = false;
        let err = build_process(&multi).unwrap_err();
        assert_eq!(err.error_code(), "ERR_TEMPLATE_STATE_NOT_ASSIGNABLE");
    }

    #[test]
    fn test_signature_errors_name_the_computation() {
        let bad = definition("p", ProcessKind::Iterative, "int32@SERVER", "(int32@SERVER -> int32@SERVER)");
        match build_process(&bad).unwrap_err() {
            DocumentError::Signature { process, computation, .. } => {
                assert_eq!(process, "p");
                assert_eq!(computation, "initialize_fn");
            }
            err => panic!("Expected Signature error, got {:?}", err),
        }
    }

    #[test]
    fn test_build_document_collects_every_failure() {
        let doc = document(vec![
            counter("ok"),
            counter("ok"),
            definition("bad-state", ProcessKind::Iterative, "( -> int32@SERVER)", "(float32@SERVER -> float32@SERVER)"),
            definition("bad-sig", ProcessKind::Measured, "( -> int32@SERVER", "(int32@SERVER -> int32@SERVER)"),
        ]);
        let err = build_document(&doc).unwrap_err();
        let codes: Vec<_> = err.errors().iter().map(|e| e.error_code()).collect();
        assert_eq!(
            codes,
            vec![
                "ERR_DOC_DUPLICATE_PROCESS",
                "ERR_TEMPLATE_STATE_NOT_ASSIGNABLE",
                "ERR_TYPE_UNEXPECTED_END",
            ]
        );
    }
}

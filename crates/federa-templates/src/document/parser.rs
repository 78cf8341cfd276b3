use super::definition::ProcessDocument;
use super::error::DocumentError;

/// Supported process document version
pub const SUPPORTED_VERSION: &str = "1.0";

/// Parse a YAML string into a ProcessDocument.
///
/// This only converts YAML into structured data and checks the version;
/// names, signatures and templates are validated separately.
pub fn parse_process_document(yaml_str: &str) -> Result<ProcessDocument, DocumentError> {
    let document: ProcessDocument = serde_yaml::from_str(yaml_str)?;

    if document.version != SUPPORTED_VERSION {
        return Err(DocumentError::UnsupportedVersion(document.version));
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ProcessKind;

    #[test]
    fn test_parse_minimal_valid_document() {
        let yaml = r#"
        version: "1.0"
        processes: []
        "#;

        let result = parse_process_document(yaml);
        assert!(result.is_ok(), "Failed to parse valid document: {:?}", result.err());
        assert!(result.unwrap().processes.is_empty());
    }

    #[test]
    fn test_parse_process_fields() {
        let yaml = r#"
        version: "1.0"
        processes:
          - name: counter
            kind: iterative
            description: "Counts rounds"
            initialize_fn:
              name: init
              type_signature: "( -> int32@SERVER)"
            next_fn:
              name: next
              type_signature: "(int32@SERVER -> int32@SERVER)"
            metadata:
              owner: "research"
        "#;

        let doc = parse_process_document(yaml).unwrap();
        let process = &doc.processes[0];
        assert_eq!(process.name, "counter");
        assert_eq!(process.kind, ProcessKind::Iterative);
        assert!(!process.multi_arg);
        assert_eq!(process.description.as_deref(), Some("Counts rounds"));
        assert_eq!(process.initialize_fn.type_signature, "( -> int32@SERVER)");
        assert_eq!(process.metadata["owner"], serde_json::json!("research"));
    }

    #[test]
    fn test_invalid_yaml_syntax() {
        let yaml = r#"
        version: "1.0"
        processes: [
          - name: broken
        "#;

        match parse_process_document(yaml).unwrap_err() {
            DocumentError::YamlError(_) => {}
            err => panic!("Expected YamlError, got {:?}", err),
        }
    }

    #[test]
    fn test_unknown_kind_is_a_yaml_error() {
        let yaml = r#"
        version: "1.0"
        processes:
          - name: p
            kind: federated_averaging
            initialize_fn: { name: init, type_signature: "( -> int32@SERVER)" }
            next_fn: { name: next, type_signature: "(int32@SERVER -> int32@SERVER)" }
        "#;

        assert!(matches!(
            parse_process_document(yaml).unwrap_err(),
            DocumentError::YamlError(_)
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let yaml = r#"
        version: "2.0"
        processes: []
        "#;

        match parse_process_document(yaml).unwrap_err() {
            DocumentError::UnsupportedVersion(version) => assert_eq!(version, "2.0"),
            err => panic!("Expected UnsupportedVersion, got {:?}", err),
        }
    }
}

use federa_cli::{check_file, run, CheckConfig, CliError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const VALID: &str = r#"
version: "1.0"
processes:
  - name: sgd-apply
    kind: finalizer
    initialize_fn: { name: init, type_signature: "( -> <lr=float32>@SERVER)" }
    next_fn:
      name: next
      type_signature: >-
        (<<lr=float32>@SERVER,
          ModelWeights<trainable=<float32[4]>,non_trainable=<>>@SERVER,
          <float32[4]>@SERVER> ->
         <state=<lr=float32>@SERVER,
          result=ModelWeights<trainable=<float32[4]>,non_trainable=<>>@SERVER,
          measurements=<>@SERVER>)
"#;

const INVALID: &str = r#"
version: "1.0"
processes:
  - name: clients-state
    kind: finalizer
    initialize_fn: { name: init, type_signature: "( -> {int32}@CLIENTS)" }
    next_fn:
      name: next
      type_signature: >-
        (<{int32}@CLIENTS,
          ModelWeights<trainable=<float32[4]>,non_trainable=<>>@SERVER,
          <float32[4]>@SERVER> ->
         <state={int32}@CLIENTS,
          result=ModelWeights<trainable=<float32[4]>,non_trainable=<>>@SERVER,
          measurements=<>@SERVER>)
"#;

fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn checker() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_federa-check"));
    for key in [
        "FEDERA_CONFIG",
        "FEDERA_LOG_FILTER",
        "FEDERA_LOG_JSON",
        "FEDERA_FAIL_FAST",
        "FEDERA_OUTPUT_FORMAT",
        "RUST_LOG",
    ] {
        command.env_remove(key);
    }
    command
}

#[test]
fn test_check_file_reports_each_document() {
    let dir = TempDir::new().unwrap();

    let valid = check_file(&write_doc(&dir, "valid.yaml", VALID)).unwrap();
    assert!(valid.valid);
    assert_eq!(valid.processes[0].state_type, "<lr=float32>@SERVER");

    let invalid = check_file(&write_doc(&dir, "invalid.yaml", INVALID)).unwrap();
    assert!(!invalid.valid);
    assert_eq!(invalid.errors[0].code, "ERR_TEMPLATE_PLACEMENT");
    assert!(invalid.errors[0].message.contains("clients-state"));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = check_file(Path::new("/nonexistent/process.yaml")).unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
}

#[test]
fn test_run_fail_fast_stops_at_first_invalid_document() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_doc(&dir, "a.yaml", INVALID),
        write_doc(&dir, "b.yaml", VALID),
    ];

    let all = run(&CheckConfig::default(), &files).unwrap();
    assert_eq!(all.len(), 2);

    let config = CheckConfig {
        fail_fast: true,
        ..CheckConfig::default()
    };
    let first = run(&config, &files).unwrap();
    assert_eq!(first.len(), 1);
    assert!(!first[0].valid);
}

#[test]
fn test_binary_exit_status_and_text_output() {
    let dir = TempDir::new().unwrap();
    let valid = write_doc(&dir, "valid.yaml", VALID);
    let invalid = write_doc(&dir, "invalid.yaml", INVALID);

    let output = checker().arg(&valid).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ok sgd-apply (finalizer) state: <lr=float32>@SERVER"));

    let output = checker().arg(&valid).arg(&invalid).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("error[ERR_TEMPLATE_PLACEMENT]"));
}

#[test]
fn test_binary_json_output_from_config_file() {
    let dir = TempDir::new().unwrap();
    let valid = write_doc(&dir, "valid.yaml", VALID);
    let config = write_doc(&dir, "federa.yaml", "output_format: json\n");

    let output = checker().arg("--config").arg(&config).arg(&valid).output().unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["valid"], serde_json::json!(true));
    assert_eq!(reports[0]["processes"][0]["name"], serde_json::json!("sgd-apply"));
}

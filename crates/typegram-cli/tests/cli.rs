//! Integration tests running the `typegram` binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

const MANIFEST: &str = r#"{ "modules": [{ "name": "App", "types": [
    { "key": "i", "namespace": "N", "name": "I", "public": true,
      "interface": true, "abstract": true },
    { "key": "c", "namespace": "N", "name": "C", "public": true, "interfaces": ["i"] }
] }] }"#;

fn typegram(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_typegram"))
        .args(args)
        .env("TYPEGRAM_LOG_LEVEL", "off")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn typegram");
    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        pipe.write_all(stdin.unwrap_or("").as_bytes())
            .expect("failed to write stdin");
    }
    child.wait_with_output().expect("failed to wait for typegram")
}

#[test]
fn test_render_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("types.json");
    let output = dir.path().join("types.puml");
    std::fs::write(&input, MANIFEST).unwrap();

    let result = typegram(
        &["render", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()],
        None,
    );
    assert!(result.status.success());
    assert!(result.stdout.is_empty());

    let diagram = std::fs::read_to_string(&output).unwrap();
    assert!(diagram.starts_with("@startuml\n"));
    assert!(diagram.contains("  \"I\" <|.. \"C\"\n"));
    assert!(diagram.ends_with("@enduml\n"));
}

#[test]
fn test_render_stdin_to_stdout() {
    let result = typegram(&["render"], Some(MANIFEST));
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("namespace N {"));
}

#[test]
fn test_render_invalid_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("types.puml");

    let result = typegram(&["render", "-o", output.to_str().unwrap()], Some("{ not json"));
    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Error:"));
}

#[test]
fn test_classify_json() {
    let result = typegram(&["classify", "--json", "-i", "-"], Some(MANIFEST));
    assert!(result.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "I");
    assert_eq!(rows[0]["category"], "Interface");
    assert_eq!(rows[1]["admitted"], true);
}

#[test]
fn test_validate_reports_counts() {
    let result = typegram(&["validate"], Some(MANIFEST));
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("1 modules, 2 types"));
}

#[test]
fn test_validate_rejects_dangling_reference() {
    let input = r#"{ "references": [
        { "key": "c", "namespace": "N", "name": "C", "base_type": "nowhere" }
    ] }"#;
    let result = typegram(&["validate"], Some(input));
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("Invalid manifest"));
}

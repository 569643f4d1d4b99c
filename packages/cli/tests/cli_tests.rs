//! End-to-end runs of the `mailframe` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn mailframe(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mailframe"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run mailframe")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const BROKEN: &str = r#"{
    "root": {"type": "EmailLayout", "data": {"childrenIds": ["ghost", "cta"]}},
    "cta": {"type": "Button", "data": {"props": {"text": "Go"}}}
}"#;

#[test]
fn test_init_then_compile() {
    let dir = tempfile::tempdir().unwrap();

    let output = mailframe(dir.path(), &["init"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join("mailframe.config.json").exists());
    assert!(dir.path().join("template.json").exists());

    let output = mailframe(dir.path(), &["validate", "template.json"]);
    assert!(output.status.success(), "{}", stdout(&output));

    let output = mailframe(dir.path(), &["compile", "template.json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let html = fs::read_to_string(dir.path().join("dist/template.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Click me"));
}

#[test]
fn test_init_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("mailframe.config.json"), "{\"outDir\": \"mine\"}").unwrap();

    let output = mailframe(dir.path(), &["init"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    assert_eq!(
        fs::read_to_string(dir.path().join("mailframe.config.json")).unwrap(),
        "{\"outDir\": \"mine\"}"
    );
}

#[test]
fn test_validate_reports_schema_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("bad.json"),
        r#"{
            "root": {"type": "EmailLayout", "data": {"childrenIds": ["b"]}},
            "b": {"type": "Heading", "data": {"props": {"level": "h9"}}}
        }"#,
    )
    .unwrap();

    let output = mailframe(dir.path(), &["validate", "bad.json"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("props.level"));
    assert!(stderr(&output).contains("Error:"));
}

#[test]
fn test_validate_reports_dangling_child() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();

    let output = mailframe(dir.path(), &["validate", "broken.json"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("missing child 'ghost'"));
}

#[test]
fn test_compile_skips_dangling_child_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();

    let output = mailframe(dir.path(), &["compile", "broken.json", "--stdout", "--compact"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let html = stdout(&output);
    assert!(html.contains(">Go</div>"));
    assert!(!html.contains("ghost"));
    assert_eq!(html.trim_end().lines().count(), 1);
}

#[test]
fn test_compile_directory_uses_config_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("emails/welcome")).unwrap();
    fs::write(
        dir.path().join("mailframe.config.json"),
        r#"{"outDir": "build", "preview": true}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("emails/welcome/index.json"),
        r#"{
            "root": {"type": "EmailLayout", "data": {"childrenIds": ["h"]}},
            "h": {"type": "Heading", "data": {"props": {"text": "Hi", "level": "h5"}}}
        }"#,
    )
    .unwrap();

    let output = mailframe(dir.path(), &["compile", "emails"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let html = fs::read_to_string(dir.path().join("build/welcome/index.html")).unwrap();
    assert!(html.contains("<h5>Hi</h5>"));
}

#[test]
fn test_compile_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();

    let output = mailframe(dir.path(), &["compile", "broken.json", "--root", "main"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Root block not found: main"));
}

#[test]
fn test_tree_shows_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();

    let output = mailframe(dir.path(), &["tree", "broken.json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("EmailLayout [root]"));
    assert!(text.contains("<missing> [ghost]"));
    assert!(text.contains("Button [cta]"));
    assert!(text.contains("2 block(s)"));
}

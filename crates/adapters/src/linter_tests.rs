// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Write an executable shell script acting as a linter plugin
fn plugin(dir: &Path, body: &str) -> LinterPlugin {
    let path = dir.join("registry-lint-test");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    LinterPlugin::at(path)
}

fn request() -> LinterRequest {
    LinterRequest {
        spec_directory: "/tmp/specs".to_string(),
        rule_ids: vec!["operation-id".to_string()],
    }
}

#[test]
fn named_plugin_uses_prefix() {
    assert_eq!(LinterPlugin::named("spectral").program(), "registry-lint-spectral");
}

#[tokio::test]
async fn parses_problems_from_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let linter = plugin(
        dir.path(),
        r#"cat > /dev/null
echo "checking" >&2
echo '{"lint":{"name":"test","files":[{"file_path":"openapi.yaml","problems":[{"message":"missing operationId","rule_id":"operation-id"}]}]}}'"#,
    );

    let response = linter.run(&request()).await.unwrap();
    let lint = response.lint.unwrap();
    assert_eq!(lint.name, "test");
    assert_eq!(lint.files[0].file_path, "openapi.yaml");
    assert_eq!(lint.files[0].problems[0].rule_id, "operation-id");
}

#[tokio::test]
async fn request_is_written_to_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let captured = dir.path().join("request.json");
    let linter = plugin(
        dir.path(),
        &format!("cat > {}\necho '{{}}'", captured.display()),
    );

    linter.run(&request()).await.unwrap();
    let sent: LinterRequest =
        serde_json::from_str(&std::fs::read_to_string(captured).unwrap()).unwrap();
    assert_eq!(sent, request());
}

#[tokio::test]
async fn plugin_errors_are_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let linter = plugin(dir.path(), r#"cat > /dev/null; echo '{"errors":["bad spec directory"]}'"#);
    match linter.run(&request()).await {
        Err(LinterError::Plugin { errors, .. }) => assert_eq!(errors, vec!["bad spec directory"]),
        other => panic!("expected plugin error, got {other:?}"),
    }
}

#[tokio::test]
async fn nonzero_exit_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let linter = plugin(dir.path(), "cat > /dev/null; echo boom >&2; exit 2");
    match linter.run(&request()).await {
        Err(LinterError::Exit { code, stderr, .. }) => {
            assert_eq!(code, 2);
            assert_eq!(stderr.trim(), "boom");
        }
        other => panic!("expected exit error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_output_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let linter = plugin(dir.path(), "cat > /dev/null; echo not-json");
    assert!(matches!(
        linter.run(&request()).await,
        Err(LinterError::Decode { .. })
    ));
}

#[tokio::test]
async fn missing_plugin_is_spawn_error() {
    let linter = LinterPlugin::named("does-not-exist-anywhere");
    assert!(matches!(
        linter.run(&request()).await,
        Err(LinterError::Spawn { .. })
    ));
}

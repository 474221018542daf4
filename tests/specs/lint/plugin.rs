//! Linter plugin specs

use crate::prelude::*;

const RESPONSE: &str = r#"{"lint":{"name":"fake","files":[{"file_path":"openapi.yaml","problems":[{"message":"missing description","rule_id":"doc"}]}]}}"#;

#[test]
fn lint_prints_plugin_response() {
    let temp = Project::empty();
    temp.file("specs/openapi.yaml", "openapi: 3.0.0\n");
    temp.script(
        "registry-lint-fake",
        &format!("cat > request.json\necho '{RESPONSE}'"),
    );

    temp.reg()
        .args(&["lint", "specs", "--plugin", "./registry-lint-fake", "--rule", "doc"])
        .passes()
        .stdout_has("missing description")
        .stdout_has("\"rule_id\": \"doc\"");

    let request = std::fs::read_to_string(temp.path().join("request.json")).unwrap();
    assert!(request.contains("\"spec_directory\":\"specs\""));
    assert!(request.contains("\"rule_ids\":[\"doc\"]"));
}

#[test]
fn plugin_errors_fail_the_command() {
    let temp = Project::empty();
    temp.script(
        "registry-lint-broken",
        r#"cat > /dev/null
echo '{"errors":["unsupported format"]}'"#,
    );

    temp.reg()
        .args(&["lint", "specs", "--plugin", "./registry-lint-broken"])
        .fails()
        .stderr_has("unsupported format");
}

#[test]
fn missing_linter_fails() {
    let temp = Project::empty();

    temp.reg()
        .args(&["lint", "specs", "--linter", "does-not-exist"])
        .env("PATH", temp.path().to_str().unwrap())
        .fails()
        .stderr_has("registry-lint-does-not-exist");
}

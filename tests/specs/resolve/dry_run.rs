//! Dry-run planning specs
//!
//! `reg resolve --dry-run` lists what would be generated without writing.

use crate::prelude::*;

#[test]
fn dry_run_lists_one_action_per_spec() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--dry-run", "--project", "demo"])
        .args(&["--address", registry.address()])
        .passes()
        .stdout_has(
            "projects/demo/locations/global/apis/petstore/versions/1.0.0/specs/openapi.yaml/artifacts/lint-gnostic",
        )
        .stdout_has(
            "echo lint projects/demo/locations/global/apis/petstore/versions/1.1.0/specs/openapi.yaml",
        )
        .stdout_has("echo score projects/demo/locations/global/apis/petstore");

    assert!(registry
        .requests()
        .iter()
        .all(|request| request.starts_with("GET ")));
}

#[test]
fn dry_run_json_output() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);
    let registry = FakeRegistry::petstore();

    let output = temp
        .reg()
        .args(&["resolve", "manifest.toml", "--dry-run", "--format", "json"])
        .args(&["--project", "demo", "--address", registry.address()])
        .passes();

    let planned: Vec<serde_json::Value> = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(planned.len(), 4);
    let receipts = planned
        .iter()
        .filter(|p| p["requires_receipt"] == serde_json::Value::Bool(true))
        .count();
    assert_eq!(receipts, 1);
}

#[test]
fn unreachable_registry_skips_rules() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);

    temp.reg()
        .args(&["resolve", "manifest.toml", "--dry-run", "--project", "demo"])
        .args(&["--address", "http://127.0.0.1:9", "--timeout", "2s"])
        .passes()
        .stdout_eq("")
        .stderr_has("skipping rule");
}

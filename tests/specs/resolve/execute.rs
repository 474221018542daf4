//! Action execution specs

use crate::prelude::*;

fn manifest(action: &str) -> String {
    format!(
        r#"
id = "exec"

[[generated_resources]]
pattern = "apis/-/versions/-/specs/-/artifacts/lint-gnostic"
action = "{action}"
receipt = true

[[generated_resources.dependencies]]
pattern = "$resource.spec"
"#
    )
}

#[test]
fn successful_actions_write_receipts() {
    let temp = Project::empty();
    temp.file("manifest.toml", &manifest("echo lint $resource.spec"));
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo", "--jobs", "2"])
        .args(&["--address", registry.address()])
        .passes()
        .stdout_has("3 succeeded, 0 failed");

    let writes: Vec<String> = registry
        .requests()
        .into_iter()
        .filter(|r| r.starts_with("POST "))
        .collect();
    assert_eq!(writes.len(), 3, "{writes:?}");
    assert!(writes.iter().all(|w| w.ends_with("/specs/openapi.yaml/artifacts")));
}

#[test]
fn failing_actions_fail_the_run() {
    let temp = Project::empty();
    temp.file("manifest.toml", &manifest("false $resource.spec"));
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo"])
        .args(&["--address", registry.address()])
        .fails()
        .stdout_has("0 succeeded, 3 failed")
        .stderr_has("3 of 3 actions failed");

    assert!(registry.requests().iter().all(|r| !r.starts_with("POST ")));
}

#[test]
fn recursive_actions_are_rejected() {
    let temp = Project::empty();
    temp.file("manifest.toml", &manifest("reg resolve other.toml $resource.spec"));
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo"])
        .args(&["--address", registry.address()])
        .fails()
        .stdout_has("FAILED reg resolve other.toml")
        .stdout_has("recursively");
}

#[test]
fn recursive_actions_behind_options_are_rejected() {
    let temp = Project::empty();
    temp.file(
        "manifest.toml",
        &manifest("cd . && FOO=1 reg --project demo resolve other.toml $resource.spec"),
    );
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo"])
        .args(&["--address", registry.address()])
        .fails()
        .stdout_has("0 succeeded, 3 failed")
        .stdout_has("recursively");
}

#[test]
fn actions_see_resolve_depth() {
    let temp = Project::empty();
    temp.file(
        "manifest.toml",
        &manifest("echo $REG_RESOLVE_DEPTH >> depth.txt # $resource.spec"),
    );
    let registry = FakeRegistry::petstore();

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo"])
        .args(&["--address", registry.address()])
        .passes();

    let depths = std::fs::read_to_string(temp.path().join("depth.txt")).unwrap();
    assert_eq!(depths.lines().collect::<Vec<_>>(), vec!["1", "1", "1"]);
}

//! Manifest validation specs

use crate::prelude::*;

#[test]
fn valid_manifest_passes() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);

    temp.reg()
        .args(&["validate", "manifest.toml"])
        .passes()
        .stdout_eq("manifest.toml: 2 rules ok\n");
}

#[test]
fn wildcard_target_is_reported() {
    let temp = Project::empty();
    temp.file(
        "manifest.toml",
        r#"
id = "bad"

[[generated_resources]]
pattern = "apis/-/versions/-/specs/-"
action = "compute lint $resource.spec"
dependencies = ["$resource.spec"]
"#,
    );

    temp.reg()
        .args(&["validate", "manifest.toml"])
        .fails()
        .stdout_has("must end with a resource id")
        .stderr_has("manifest.toml has");
}

#[test]
fn ungrounded_action_reference_is_reported() {
    let temp = Project::empty();
    temp.file(
        "manifest.toml",
        r#"
id = "bad"

[[generated_resources]]
pattern = "apis/-/versions/-/specs/-/artifacts/score"
action = "compute score $resource.spec"
dependencies = ["$resource.api/artifacts/policy"]
"#,
    );

    temp.reg()
        .args(&["validate", "manifest.toml"])
        .fails()
        .stdout_has("no dependency");
}

#[test]
fn malformed_toml_fails() {
    let temp = Project::empty();
    temp.file("manifest.toml", "id = [");

    temp.reg()
        .args(&["validate", "manifest.toml"])
        .fails()
        .stderr_has("error: loading manifest.toml");
}

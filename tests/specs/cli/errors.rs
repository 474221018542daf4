//! Error reporting specs
//!
//! Failures print a message, context, and suggestions on stderr.

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.reg().args(&["frobnicate"]).fails();
}

#[test]
fn missing_manifest_file_fails() {
    let temp = Project::empty();

    temp.reg()
        .args(&["resolve", "nope.toml", "--project", "demo"])
        .fails()
        .stderr_has("error: loading nope.toml");
}

#[test]
fn resolve_requires_a_project() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);

    temp.reg()
        .args(&["resolve", "manifest.toml"])
        .fails()
        .stderr_has("no registry project configured")
        .stderr_has("REGISTRY_PROJECT");
}

#[test]
fn resolve_refuses_to_nest() {
    let temp = Project::empty();
    temp.file("manifest.toml", LINT_MANIFEST);

    temp.reg()
        .args(&["resolve", "manifest.toml", "--project", "demo"])
        .env("REG_RESOLVE_DEPTH", "1")
        .fails()
        .stderr_has("refusing to resolve a manifest from inside an action");
}

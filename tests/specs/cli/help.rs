//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.reg()
        .args(&["--help"])
        .passes()
        .stdout_has("resolve")
        .stdout_has("validate")
        .stdout_has("lint");
}

#[test]
fn resolve_help_shows_options() {
    let temp = Project::empty();

    temp.reg()
        .args(&["resolve", "--help"])
        .passes()
        .stdout_has("--dry-run")
        .stdout_has("--jobs");
}

#[test]
fn help_shows_registry_env_vars() {
    let temp = Project::empty();

    temp.reg()
        .args(&["--help"])
        .passes()
        .stdout_has("REGISTRY_ADDRESS")
        .stdout_has("REGISTRY_PROJECT");
}

#[test]
fn version_is_printed() {
    let temp = Project::empty();

    temp.reg()
        .args(&["--version"])
        .passes()
        .stdout_has("reg ");
}

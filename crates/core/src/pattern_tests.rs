// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const LINT: &str = "projects/p/locations/global/apis/-/versions/-/specs/-/artifacts/lint-gnostic";

#[test]
fn extend_to_spec() {
    assert_eq!(
        extend(LINT, "$resource.spec").unwrap(),
        "projects/p/locations/global/apis/-/versions/-/specs/-"
    );
}

#[parameterized(
    api_suffix = { "$resource.api/artifacts/summary", "projects/p/locations/global/apis/-/artifacts/summary" },
    version_suffix = { "$resource.version/specs/-", "projects/p/locations/global/apis/-/versions/-/specs/-" },
    artifact = { "$resource.artifact", LINT },
)]
fn extend_keeps_suffix(dependency: &str, expected: &str) {
    assert_eq!(extend(LINT, dependency).unwrap(), expected);
}

#[parameterized(
    global_artifact = { "artifacts/styleguide" },
    absolute = { "projects/other/locations/global/apis/-" },
)]
fn extend_without_reference_is_identity(dependency: &str) {
    assert_eq!(extend(LINT, dependency).unwrap(), dependency);
}

#[test]
fn extend_works_on_relative_patterns() {
    assert_eq!(
        extend("apis/-/versions/-/specs/-/artifacts/lint", "$resource.version").unwrap(),
        "apis/-/versions/-"
    );
}

#[test]
fn extend_missing_entity_is_error() {
    let err =
        extend("projects/p/locations/global/apis/-/artifacts/x", "$resource.spec").unwrap_err();
    assert!(matches!(err, PatternError::MissingEntity { kind: ResourceKind::Spec, .. }));
}

#[parameterized(
    unknown_kind = { "$resource.widget" },
    no_kind = { "$resource" },
    glued = { "$resourcespec" },
)]
fn extend_bad_reference_is_error(dependency: &str) {
    assert!(extend(LINT, dependency).is_err());
}

#[test]
fn entity_prefix_ignores_ids_named_like_collections() {
    let pattern = "apis/specs/versions/v/specs/s";
    assert_eq!(entity_prefix(pattern, ResourceKind::Spec), Some(pattern));
    assert_eq!(entity_prefix(pattern, ResourceKind::Api), Some("apis/specs"));
}

#[test]
fn substitute_replaces_prefix() {
    assert_eq!(
        substitute(
            LINT,
            ResourceKind::Spec,
            "projects/p/locations/global/apis/a/versions/v/specs/s"
        )
        .as_deref(),
        Some("projects/p/locations/global/apis/a/versions/v/specs/s/artifacts/lint-gnostic")
    );
    assert_eq!(substitute("projects/p/locations/global/apis/-", ResourceKind::Spec, "x"), None);
}

#[test]
fn group_key_global_without_reference() {
    let name = ResourceName::parse("projects/p/locations/global/apis/a").unwrap();
    assert_eq!(group_key("artifacts/styleguide", &name).unwrap(), GroupKey::Global);
}

#[test]
fn group_key_uses_ancestor() {
    let name = ResourceName::parse(
        "projects/p/locations/global/apis/a/versions/v/specs/s/artifacts/lint",
    )
    .unwrap();
    assert_eq!(
        group_key("$resource.version", &name).unwrap(),
        GroupKey::Entity("projects/p/locations/global/apis/a/versions/v".into())
    );
}

#[test]
fn group_key_missing_ancestor_is_error() {
    let name = ResourceName::parse("projects/p/locations/global/apis/a").unwrap();
    assert!(matches!(
        group_key("$resource.spec", &name),
        Err(PatternError::EmptyAncestor { .. })
    ));
}

#[test]
fn template_references_are_deduplicated() {
    let kinds =
        template_references("compute $resource.spec --with $resource.api $resource.spec").unwrap();
    assert_eq!(kinds, vec![ResourceKind::Spec, ResourceKind::Api]);
    assert!(template_references("compute $resource.apispec").is_err());
    assert!(template_references("compute summary").unwrap().is_empty());
}

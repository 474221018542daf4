// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static checks on generated-resource rules

use crate::{GeneratedResourceRule, Manifest};
use reg_core::pattern::{extend, template_references, Reference};
use reg_core::{Pattern, PatternError, ProjectName, ResourceKind, Shape, WILDCARD};
use thiserror::Error;

/// A rule that can never be planned correctly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid target pattern {pattern}: {source}")]
    Target {
        pattern: String,
        source: PatternError,
    },

    #[error("target pattern {0} must end with a resource id")]
    WildcardTarget(String),

    #[error("dependency {dependency:?} of {pattern}: {source}")]
    Dependency {
        pattern: String,
        dependency: String,
        source: PatternError,
    },

    #[error("action {action:?} of {pattern}: {source}")]
    Action {
        pattern: String,
        action: String,
        source: PatternError,
    },

    #[error("action {action:?} references the {kind}, which no dependency of {pattern} provides")]
    UngroundedReference {
        pattern: String,
        action: String,
        kind: ResourceKind,
    },

    #[error("refresh interval of {0} must be positive")]
    ZeroRefresh(String),

    #[error("{0} sets a refresh interval and dependencies; use one or the other")]
    RefreshWithDependencies(String),

    #[error("{0} has neither dependencies nor a refresh interval")]
    NoTrigger(String),
}

/// Validate every rule, collecting all problems
pub fn validate_manifest(project: &ProjectName, manifest: &Manifest) -> Vec<ValidationError> {
    manifest
        .generated_resources
        .iter()
        .flat_map(|rule| validate_rule(project, rule))
        .collect()
}

/// Validate one rule against the project it will run in
pub fn validate_rule(project: &ProjectName, rule: &GeneratedResourceRule) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let target_pattern = project.qualify(&rule.pattern);

    let target = match Pattern::parse(&target_pattern) {
        Ok(target) => target,
        Err(source) => {
            errors.push(ValidationError::Target {
                pattern: rule.pattern.clone(),
                source,
            });
            return errors;
        }
    };
    if target.shape == Shape::Collection || target.name.id() == WILDCARD {
        errors.push(ValidationError::WildcardTarget(rule.pattern.clone()));
    }

    match rule.refresh {
        Some(refresh) if refresh.is_zero() => {
            errors.push(ValidationError::ZeroRefresh(rule.pattern.clone()));
        }
        Some(_) if !rule.dependencies.is_empty() => {
            errors.push(ValidationError::RefreshWithDependencies(rule.pattern.clone()));
        }
        None if rule.dependencies.is_empty() => {
            errors.push(ValidationError::NoTrigger(rule.pattern.clone()));
        }
        _ => {}
    }

    // Kinds an action may reference: the shared ancestor of each dependency
    // and anything the dependency pattern descends into below it
    let mut provided = Vec::new();
    let mut has_reference = false;
    for dependency in &rule.dependencies {
        let dependency_error = |source| ValidationError::Dependency {
            pattern: rule.pattern.clone(),
            dependency: dependency.pattern.clone(),
            source,
        };
        let reference = match Reference::parse(&dependency.pattern) {
            Ok(reference) => reference,
            Err(e) => {
                errors.push(dependency_error(e));
                continue;
            }
        };
        let listable = extend(&target_pattern, &dependency.pattern)
            .map(|p| project.qualify(&p))
            .and_then(|p| Pattern::parse(&p));
        let listable = match listable {
            Ok(listable) => listable,
            Err(e) => {
                errors.push(dependency_error(e));
                continue;
            }
        };
        if let Some(reference) = reference {
            has_reference = true;
            for kind in REFERENCE_KINDS {
                if kind.depth() >= reference.kind.depth()
                    && listable.name.ancestor(kind).is_some()
                    && !provided.contains(&kind)
                {
                    provided.push(kind);
                }
            }
        }
    }

    let action_error = |source| ValidationError::Action {
        pattern: rule.pattern.clone(),
        action: rule.action.clone(),
        source,
    };
    match template_references(&rule.action) {
        Err(e) => errors.push(action_error(e)),
        Ok(kinds) => {
            for kind in kinds {
                if target.name.ancestor(kind).is_none() {
                    errors.push(action_error(PatternError::EmptyAncestor {
                        kind,
                        name: target_pattern.clone(),
                    }));
                } else if has_reference && !provided.contains(&kind) {
                    errors.push(ValidationError::UngroundedReference {
                        pattern: rule.pattern.clone(),
                        action: rule.action.clone(),
                        kind,
                    });
                }
            }
        }
    }
    if !rule.dependencies.is_empty() && !has_reference && rule.action.contains("$resource") {
        errors.push(action_error(PatternError::Unresolved(rule.action.clone())));
    }

    errors
}

const REFERENCE_KINDS: [ResourceKind; 5] = [
    ResourceKind::Api,
    ResourceKind::Version,
    ResourceKind::Spec,
    ResourceKind::Deployment,
    ResourceKind::Artifact,
];

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

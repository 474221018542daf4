// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `$resource` references in dependency patterns
//!
//! A dependency pattern such as `$resource.spec/artifacts/lint` is relative
//! to whatever resource a rule is evaluating. Extending it against the rule's
//! own pattern turns it into a listable pattern; resolving it against a
//! concrete resource yields the group that resource belongs to.

use crate::error::PatternError;
use crate::name::ResourceName;
use crate::name::ResourceKind;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const RESOURCE_TOKEN: &str = "$resource";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$resource\.([A-Za-z_]+)(/.*)?$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TEMPLATE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$resource\.(\w+)").expect("constant regex pattern is valid")
});

/// A leading `$resource.<kind>` reference and whatever follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ResourceKind,
    /// Remainder after the reference, empty or starting with `/`
    pub suffix: String,
}

impl Reference {
    /// Parse the reference at the start of a dependency pattern
    ///
    /// Returns `None` when the pattern does not start with `$resource`.
    pub fn parse(pattern: &str) -> Result<Option<Self>, PatternError> {
        if !pattern.starts_with(RESOURCE_TOKEN) {
            return Ok(None);
        }
        let caps = REFERENCE_PATTERN
            .captures(pattern)
            .ok_or_else(|| PatternError::Unrecognized(pattern.to_string()))?;
        let word = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let kind = ResourceKind::from_reference(word)
            .ok_or_else(|| PatternError::UnknownEntity(word.to_string()))?;
        let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        Ok(Some(Self {
            kind,
            suffix: suffix.to_string(),
        }))
    }
}

/// Kinds referenced as `$resource.<kind>` anywhere in an action template
pub fn template_references(template: &str) -> Result<Vec<ResourceKind>, PatternError> {
    let mut kinds = Vec::new();
    for caps in TEMPLATE_REFERENCE.captures_iter(template) {
        let word = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let kind = ResourceKind::from_reference(word)
            .ok_or_else(|| PatternError::UnknownEntity(word.to_string()))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Whether a template mentions `$resource` in any form
pub fn mentions_resource(template: &str) -> bool {
    template.contains(RESOURCE_TOKEN)
}

/// Longest prefix of `pattern` ending at a `<plural>/<id>` pair for `kind`
///
/// Collection keywords only sit at even segment offsets, so an id that
/// happens to equal a plural (an api named `specs`) is never mistaken for one.
pub fn entity_prefix(pattern: &str, kind: ResourceKind) -> Option<&str> {
    let collection = kind.collection();
    let mut end = None;
    let mut offset = 0;
    let segments: Vec<&str> = pattern.split('/').collect();
    for pair in segments.chunks(2) {
        let pair_len = pair.iter().map(|s| s.len()).sum::<usize>() + pair.len() - 1;
        if let [plural, _id] = pair {
            if *plural == collection {
                end = Some(offset + pair_len);
            }
        }
        offset += pair_len + 1;
    }
    end.map(|end| &pattern[..end])
}

/// Rewrite a dependency pattern relative to a rule's resource pattern
///
/// `extend("apis/-/versions/-/specs/-/artifacts/lint", "$resource.spec")`
/// yields `apis/-/versions/-/specs/-`. Patterns without a `$resource` prefix
/// are returned unchanged.
pub fn extend(resource_pattern: &str, dependency_pattern: &str) -> Result<String, PatternError> {
    let Some(reference) = Reference::parse(dependency_pattern)? else {
        return Ok(dependency_pattern.to_string());
    };
    let prefix =
        entity_prefix(resource_pattern, reference.kind).ok_or_else(|| PatternError::MissingEntity {
            kind: reference.kind,
            pattern: resource_pattern.to_string(),
        })?;
    Ok(format!("{prefix}{}", reference.suffix))
}

/// Replace the `kind` prefix of `pattern` with a concrete ancestor name
pub fn substitute(pattern: &str, kind: ResourceKind, ancestor: &str) -> Option<String> {
    let prefix = entity_prefix(pattern, kind)?;
    Some(format!("{ancestor}{}", &pattern[prefix.len()..]))
}

/// Key grouping dependency resources that share an ancestor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    /// Dependencies without a `$resource` reference; every target shares it
    Global,
    /// Full name of the shared ancestor
    Entity(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Global => f.write_str("<global>"),
            GroupKey::Entity(name) => f.write_str(name),
        }
    }
}

/// Group of `resource` with respect to a dependency pattern
pub fn group_key(
    dependency_pattern: &str,
    resource: &ResourceName,
) -> Result<GroupKey, PatternError> {
    let Some(reference) = Reference::parse(dependency_pattern)? else {
        return Ok(GroupKey::Global);
    };
    resource
        .ancestor(reference.kind)
        .map(|a| GroupKey::Entity(a.to_string()))
        .ok_or_else(|| PatternError::EmptyAncestor {
            kind: reference.kind,
            name: resource.to_string(),
        })
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

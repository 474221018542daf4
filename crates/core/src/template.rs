// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command template rendering
//!
//! Templates refer to the resource being generated as `$resource`, and to
//! its ancestors as `$resource.<kind>`. Older manifests address dependency
//! resources positionally as `$source<N>` / `$source<N>.<kind>`.

use crate::error::PatternError;
use crate::name::{ResourceKind, ResourceName};
use regex::Regex;
use std::sync::LazyLock;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(resource|source(\d+))(?:\.(\w+))?\b").expect("constant regex pattern is valid")
});

/// Render a command template against a resource
///
/// Every reference must resolve; a template that still mentions `$resource`
/// or `$source` afterwards (such as `$resourceversion`) is rejected.
pub fn render(
    template: &str,
    resource: &ResourceName,
    sources: &[ResourceName],
) -> Result<String, PatternError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in REFERENCE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let literal = &template[last..whole.start()];
        check_resolved(literal, template)?;
        out.push_str(literal);

        let base = match caps.get(2) {
            Some(index) => {
                let index: usize = index
                    .as_str()
                    .parse()
                    .map_err(|_| PatternError::Unresolved(template.to_string()))?;
                sources.get(index).ok_or(PatternError::MissingSource(index))?
            }
            None => resource,
        };

        match caps.get(3) {
            None => out.push_str(&base.to_string()),
            Some(word) => {
                let kind = ResourceKind::from_reference(word.as_str())
                    .ok_or_else(|| PatternError::UnknownEntity(word.as_str().to_string()))?;
                let ancestor = base.ancestor(kind).ok_or_else(|| PatternError::EmptyAncestor {
                    kind,
                    name: base.to_string(),
                })?;
                out.push_str(&ancestor.to_string());
            }
        }
        last = whole.end();
    }

    let rest = &template[last..];
    check_resolved(rest, template)?;
    out.push_str(rest);
    Ok(out)
}

fn check_resolved(literal: &str, template: &str) -> Result<(), PatternError> {
    if literal.contains("$resource") || literal.contains("$source") {
        return Err(PatternError::Unresolved(template.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listing every resource that matches a pattern

use crate::error::ControllerError;
use reg_adapters::{ListRequest, RegistryAdapter};
use reg_core::{Pattern, ResourceInstance, ResourceKind, ResourceName, Revision, Shape, WILDCARD};

/// List all resources matching `pattern`, following every page
///
/// Collections and wildcard ids list everything under the parent. A concrete
/// leaf id narrows the listing with an `<kind>_id == '<id>'` clause, since
/// the registry only lists by parent. `filter` is passed through verbatim.
pub async fn list_resources<R: RegistryAdapter>(
    registry: &R,
    pattern: &str,
    filter: &str,
) -> Result<Vec<ResourceInstance>, ControllerError> {
    let pattern = Pattern::parse(pattern)?;
    let (request, revision) = request_for(&pattern, filter);

    let mut resources = Vec::new();
    let mut request = request;
    loop {
        let page = registry.list(&request).await?;
        resources.extend(page.resources);
        if page.next_page_token.is_empty() {
            break;
        }
        request = request.with_page_token(page.next_page_token);
    }

    // A concrete revision is found by listing all of them
    if let Some(revision) = revision {
        resources.retain(|r| revision_of(&r.name).as_deref() == Some(revision.as_str()));
    }

    tracing::debug!(%pattern, count = resources.len(), "listed resources");
    Ok(resources)
}

fn request_for(pattern: &Pattern, filter: &str) -> (ListRequest, Option<String>) {
    let name = &pattern.name;
    let kind = pattern.kind();

    if let ResourceName::Spec(spec) = name {
        if let Some(revision) = spec.revision() {
            let request = ListRequest::new(kind, spec.without_revision().to_string())
                .with_filter(filter);
            return (request, concrete_revision(revision));
        }
    }
    if let ResourceName::Deployment(deployment) = name {
        if let Some(revision) = deployment.revision() {
            let request = ListRequest::new(kind, deployment.without_revision().to_string())
                .with_filter(filter);
            return (request, concrete_revision(revision));
        }
    }

    let parent = name.parent().map(|p| p.as_parent()).unwrap_or_default();
    let filter = match pattern.shape {
        Shape::Entity if name.id() != WILDCARD => narrow(filter, kind, name.id()),
        _ => filter.to_string(),
    };
    (ListRequest::new(kind, parent).with_filter(filter), None)
}

fn concrete_revision(revision: &Revision) -> Option<String> {
    match revision {
        Revision::Id(id) => Some(id.clone()),
        Revision::All => None,
    }
}

fn revision_of(name: &ResourceName) -> Option<String> {
    match name {
        ResourceName::Spec(s) => s.revision().map(|r| r.to_string()),
        ResourceName::Deployment(d) => d.revision().map(|r| r.to_string()),
        _ => None,
    }
}

fn narrow(filter: &str, kind: ResourceKind, id: &str) -> String {
    let clause = format!("{kind}_id == '{id}'");
    if filter.trim().is_empty() {
        clause
    } else {
        format!("{clause} && ({filter})")
    }
}

#[cfg(test)]
#[path = "lister_tests.rs"]
mod tests;
